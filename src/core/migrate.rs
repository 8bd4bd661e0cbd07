//! Load-time normalization of a persisted league document.
//!
//! The document carries no version field; its shape is inferred structurally.
//! Every entry point returns a fully valid [`LeagueState`]. When the input
//! cannot be salvaged the result is the fresh default league, and the reason
//! is logged rather than returned.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use log::{debug, warn};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    formation::{DEFAULT_FORMATION, Formation},
    model::{LeagueState, Lineup, MatchdayRecord, Participant, Player, seed_roster},
    types::{MATCHDAY_COUNT, MatchdayIndex, ParticipantId, PlayerId, Points, Role},
};

/// Participant id used when a stored participant has none.
pub const DEFAULT_PARTICIPANT_ID: ParticipantId = 1;

#[derive(Debug, Error)]
enum MigrateError {
    #[error("payload is not valid JSON: {0}")]
    BadJson(#[from] serde_json::Error),
    #[error("document root is not an object")]
    NotAnObject,
    #[error("player entry {0} has no usable id")]
    BadPlayer(usize),
    #[error("matchday entry {0} is not an object")]
    BadMatchday(usize),
    #[error("participant entry {index} of matchday {matchday} is not an object")]
    BadParticipant { matchday: usize, index: usize },
    #[error("{0} id {1} leaves no room for a next id")]
    IdSpaceExhausted(&'static str, u64),
}

type MigrateResult<T> = Result<T, MigrateError>;

/// Normalizes a raw JSON payload; `None` yields the default league.
pub fn migrate_str(raw: Option<&str>) -> LeagueState {
    let Some(raw) = raw else {
        debug!("no persisted league document; starting fresh");
        return LeagueState::new();
    };
    match serde_json::from_str::<Value>(raw).map_err(MigrateError::from) {
        Ok(value) => migrate(Some(&value)),
        Err(err) => fallback(err),
    }
}

/// Normalizes an already-parsed document; `None` yields the default league.
pub fn migrate(raw: Option<&Value>) -> LeagueState {
    let Some(raw) = raw else {
        debug!("no persisted league document; starting fresh");
        return LeagueState::new();
    };
    match try_migrate(raw) {
        Ok(state) => state,
        Err(err) => fallback(err),
    }
}

fn fallback(err: MigrateError) -> LeagueState {
    warn!("discarding persisted league document: {err}");
    LeagueState::new()
}

fn try_migrate(raw: &Value) -> MigrateResult<LeagueState> {
    let empty = Map::new();
    let doc = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(MigrateError::NotAnObject),
    };

    let players = match doc.get("players") {
        Some(Value::Array(entries)) => normalize_players(entries)?,
        _ => seed_roster(),
    };

    let matchdays = match doc.get("matchdays").or_else(|| doc.get("jornadas")) {
        Some(Value::Array(entries)) if entries.len() == MATCHDAY_COUNT => entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| match entry {
                Value::Object(md) => normalize_matchday(
                    idx,
                    md.get("participants"),
                    md.get("points"),
                    md.get("notPlayed"),
                    &players,
                ),
                _ => Err(MigrateError::BadMatchday(idx)),
            })
            .collect::<MigrateResult<Vec<_>>>()?,
        other => {
            if other.is_some() {
                warn!("matchday collection has the wrong shape; rebuilding it");
            }
            rebuild_matchdays(doc, &players)?
        }
    };

    let max_player_id = players.iter().map(|p| p.id).max().unwrap_or(0);
    let next_player_id = doc
        .get("nextPlayerId")
        .or_else(|| doc.get("nextId"))
        .and_then(as_id)
        .unwrap_or(1)
        .max(successor("player", max_player_id)?);

    let max_participant_id = matchdays
        .iter()
        .flat_map(|md| md.participants.iter().map(|p| p.id))
        .max()
        .unwrap_or(0);
    let next_participant_id = doc
        .get("nextParticipantId")
        .and_then(as_id)
        .unwrap_or(1)
        .max(successor("participant", max_participant_id)?);

    let current_matchday_index = doc
        .get("currentMatchdayIndex")
        .or_else(|| doc.get("currentJornada"))
        .and_then(as_id)
        .and_then(|idx| MatchdayIndex::try_from(idx).ok())
        .filter(|idx| (1..=MATCHDAY_COUNT as MatchdayIndex).contains(idx))
        .unwrap_or(1);

    Ok(LeagueState {
        players,
        next_player_id,
        next_participant_id,
        current_matchday_index,
        matchdays,
    })
}

/// Smallest id a counter may hold once `max` is taken.
fn successor(kind: &'static str, max: u64) -> MigrateResult<u64> {
    max.checked_add(1)
        .ok_or(MigrateError::IdSpaceExhausted(kind, max))
}

/// Rebuilds all matchdays; a legacy flat top-level layout lands in matchday 1.
fn rebuild_matchdays(doc: &Map<String, Value>, players: &[Player]) -> MigrateResult<Vec<MatchdayRecord>> {
    let mut matchdays = Vec::with_capacity(MATCHDAY_COUNT);
    if let Some(legacy) = doc.get("participants").filter(|v| v.is_array()) {
        debug!("migrating flat participant layout into matchday 1");
        matchdays.push(normalize_matchday(
            0,
            Some(legacy),
            doc.get("points"),
            doc.get("notPlayed"),
            players,
        )?);
    }
    while matchdays.len() < MATCHDAY_COUNT {
        matchdays.push(MatchdayRecord::for_roster(players));
    }
    Ok(matchdays)
}

fn normalize_players(entries: &[Value]) -> MigrateResult<Vec<Player>> {
    let mut seen = HashSet::new();
    let mut players = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let Value::Object(p) = entry else {
            return Err(MigrateError::BadPlayer(idx));
        };
        let id = p
            .get("id")
            .and_then(as_id)
            .ok_or(MigrateError::BadPlayer(idx))?;
        if !seen.insert(id) {
            warn!("dropping duplicate player id {id}");
            continue;
        }
        players.push(Player {
            id,
            name: p.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            roles: normalize_roles(p),
        });
    }
    Ok(players)
}

/// Role list, upgrading the legacy single `pos` field.
fn normalize_roles(p: &Map<String, Value>) -> Vec<Role> {
    let tags: Vec<&str> = match (p.get("roles"), p.get("pos")) {
        (Some(Value::Array(tags)), _) => tags.iter().filter_map(Value::as_str).collect(),
        (_, Some(Value::String(pos))) => vec![pos.as_str()],
        _ => Vec::new(),
    };
    let mut roles = Vec::with_capacity(tags.len());
    for role in tags.into_iter().filter_map(Role::from_tag) {
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    roles
}

fn normalize_matchday(
    idx: usize,
    participants: Option<&Value>,
    points: Option<&Value>,
    not_played: Option<&Value>,
    players: &[Player],
) -> MigrateResult<MatchdayRecord> {
    let participants = match participants {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(pi, entry)| match entry {
                Value::Object(pt) => Ok(normalize_participant(pt)),
                _ => Err(MigrateError::BadParticipant {
                    matchday: idx + 1,
                    index: pi,
                }),
            })
            .collect::<MigrateResult<Vec<_>>>()?,
        _ => Vec::new(),
    };

    Ok(MatchdayRecord {
        participants,
        points: overlay(players, points, 0, as_points),
        not_played: overlay(players, not_played, false, Value::as_bool),
    })
}

/// Defaults for every roster id, overwritten by whatever the stored map
/// holds for that id. Entries for ids outside the roster are dropped.
fn overlay<T: Copy>(
    players: &[Player],
    stored: Option<&Value>,
    default: T,
    coerce: fn(&Value) -> Option<T>,
) -> BTreeMap<PlayerId, T> {
    let stored = match stored {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    };
    players
        .iter()
        .map(|p| {
            let value = stored
                .and_then(|m| m.get(&p.id.to_string()))
                .and_then(coerce)
                .unwrap_or(default);
            (p.id, value)
        })
        .collect()
}

fn normalize_participant(pt: &Map<String, Value>) -> Participant {
    let formation = match pt.get("formation") {
        Some(Value::String(text)) => Formation::normalize(text),
        _ => DEFAULT_FORMATION,
    };
    let id = pt.get("id").and_then(as_id).unwrap_or(DEFAULT_PARTICIPANT_ID);
    let stored = match pt.get("lineup") {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    };

    let mut seen = HashSet::new();
    let mut lineup = Lineup::empty(formation);
    for role in Role::ALL {
        let wanted = formation.count(role);
        let ids: Vec<PlayerId> = stored
            .and_then(|m| lineup_entry(m, role))
            .into_iter()
            .flatten()
            .filter_map(as_id)
            .filter(|id| seen.insert(*id))
            .collect();
        if ids.len() > wanted {
            warn!(
                "participant {id}: dropping {} extra {role} assignment(s)",
                ids.len() - wanted
            );
        }
        let slots = lineup.slots_mut(role);
        for (slot, pid) in slots.iter_mut().zip(ids) {
            *slot = Some(pid);
        }
    }

    Participant {
        id,
        name: pt.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
        formation,
        lineup,
        captain_id: pt.get("captainId").and_then(as_id),
    }
}

/// Stored slot array for `role`, under its canonical or legacy key.
fn lineup_entry(lineup: &Map<String, Value>, role: Role) -> Option<&Vec<Value>> {
    let legacy = match role {
        Role::GK => "PT",
        Role::DF => "DF",
        Role::MD => "MC",
        Role::FW => "DL",
    };
    lineup
        .get(role.tag())
        .or_else(|| lineup.get(legacy))
        .and_then(Value::as_array)
}

fn as_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_points(value: &Value) -> Option<Points> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as Points)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
