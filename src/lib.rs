//! Season-long fantasy league state: roster, per-matchday lineups and scores,
//! load-time migration of persisted documents, and derived rankings.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::LeagueStore`]:
//! ```
//! use matchday::{core::store::LeagueStore, engine::scoring, types::Role};
//!
//! let mut store = LeagueStore::new();
//! let lia = store.add_participant("Lia").expect("participant");
//! store.assign_slot(lia, Role::GK, 0, 10).expect("assign");
//! store.set_captain(lia, Some(10)).expect("captain");
//! store.set_points(10, 4).expect("points");
//!
//! let table = store.matchday_classification();
//! assert_eq!(table[0].points, 8);
//!
//! let state = store.state();
//! let md = state.current_matchday().expect("matchday");
//! assert_eq!(scoring::participant_points(&md.participants[0], md), 8);
//! ```
//!
//! Write-through persistence with a SQLite sink:
//! ```no_run
//! use matchday::{
//!     core::store::{LeagueStore, StoreConfig},
//!     persist::sqlite::SqliteStateSink,
//! };
//!
//! let sink = SqliteStateSink::open("league.db").expect("open sqlite");
//! let mut store = LeagueStore::open(Box::new(sink), StoreConfig::default());
//! store.add_player("Iria Sanz", &["DF", "MD"]).expect("add player");
//! ```
#![deny(missing_docs)]

/// Core league store, migration and index helpers.
pub mod core;
/// Lineup and scoring engines.
pub mod engine;
/// Formation catalog.
pub mod formation;
/// League domain records.
pub mod model;
/// Mutation op model.
pub mod op;
/// Persistence abstraction and SQLite implementation.
pub mod persist;
/// Shared primitive types and enums.
pub mod types;
