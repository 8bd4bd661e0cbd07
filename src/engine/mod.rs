//! Pure lineup and scoring logic.

/// Slot assignment, formation changes and captaincy.
pub mod lineup;
/// Points, averages, team of the week and classifications.
pub mod scoring;
