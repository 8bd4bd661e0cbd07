//! Authoritative league store, load-time migration and index helpers.

/// Helper index aliases.
pub mod indices;
/// Untyped-document normalization into a valid league state.
pub mod migrate;
/// Single-writer store and mutation API.
pub mod store;
