//! Scores, team of the week and classifications, computed from snapshots.
//!
//! Nothing here fails: missing point entries count as zero and missing
//! not-played flags as false.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use serde::Serialize;

use crate::{
    core::indices::{SlotIndex, players_by_id},
    model::{MatchdayRecord, Participant, Player},
    types::{ParticipantId, PlayerId, Points, Role},
};

/// Players kept in the team of the week.
pub const TEAM_OF_THE_WEEK_SIZE: usize = 5;

/// Rounds half-up to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    ((value * 10.0) + 0.5).floor() / 10.0
}

/// Distinct non-empty slot values of the participant's lineup, in slot order.
pub fn fielded_ids(participant: &Participant) -> Vec<PlayerId> {
    let mut seen = HashSet::new();
    participant
        .lineup
        .iter_slots()
        .filter_map(|slot| *slot)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Per-player contributions that count towards the participant's score.
fn contributions<'a>(
    participant: &'a Participant,
    matchday: &'a MatchdayRecord,
) -> impl Iterator<Item = Points> + 'a {
    fielded_ids(participant)
        .into_iter()
        .filter(move |id| !matchday.is_not_played(*id))
        .map(move |id| {
            let base = matchday.base_points(id);
            if participant.captain_id == Some(id) {
                base.saturating_mul(2)
            } else {
                base
            }
        })
}

/// Sum of fielded players' points, the captain counting twice.
pub fn participant_points(participant: &Participant, matchday: &MatchdayRecord) -> Points {
    contributions(participant, matchday).fold(0, Points::saturating_add)
}

/// Mean contribution over fielded players who played, one decimal.
pub fn participant_average(participant: &Participant, matchday: &MatchdayRecord) -> f64 {
    let (sum, n) = contributions(participant, matchday)
        .fold((0 as Points, 0usize), |(sum, n), pts| (sum.saturating_add(pts), n + 1));
    if n == 0 {
        return 0.0;
    }
    round_one_decimal(sum as f64 / n as f64)
}

/// One scored entry of the team of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekPick {
    /// Player id.
    pub player_id: PlayerId,
    /// Base points in the matchday.
    pub points: Points,
}

/// Best players of one matchday, independent of any lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamOfTheWeek {
    /// Top players, best first.
    pub picks: Vec<WeekPick>,
    /// Best player, if anybody played.
    pub mvp: Option<PlayerId>,
    /// Picks grouped by primary role; every role is present.
    pub groups: BTreeMap<Role, Vec<PlayerId>>,
    /// Sum of the picks' base points.
    pub total: Points,
}

/// Top players by base points among those who played. Ties keep roster order.
pub fn team_of_the_week(matchday: &MatchdayRecord, players: &[Player]) -> TeamOfTheWeek {
    let mut scored: Vec<(&Player, Points)> = players
        .iter()
        .filter(|p| !matchday.is_not_played(p.id))
        .map(|p| (p, matchday.base_points(p.id)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(TEAM_OF_THE_WEEK_SIZE);

    let mut groups: BTreeMap<Role, Vec<PlayerId>> =
        Role::ALL.into_iter().map(|role| (role, Vec::new())).collect();
    for (player, _) in &scored {
        groups.entry(player.primary_role()).or_default().push(player.id);
    }

    TeamOfTheWeek {
        mvp: scored.first().map(|(p, _)| p.id),
        total: scored.iter().fold(0, |acc, (_, pts)| acc.saturating_add(*pts)),
        picks: scored
            .iter()
            .map(|(p, pts)| WeekPick {
                player_id: p.id,
                points: *pts,
            })
            .collect(),
        groups,
    }
}

/// Row of a single matchday's classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchdayStanding {
    /// Participant id within the matchday.
    pub participant_id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Participant points.
    pub points: Points,
    /// Participant average, one decimal.
    pub average: f64,
}

/// Participants of one matchday ranked by points, best first.
pub fn matchday_classification(matchday: &MatchdayRecord) -> Vec<MatchdayStanding> {
    let mut rows: Vec<MatchdayStanding> = matchday
        .participants
        .iter()
        .map(|p| MatchdayStanding {
            participant_id: p.id,
            name: p.display_name(),
            points: participant_points(p, matchday),
            average: participant_average(p, matchday),
        })
        .collect();
    rows.sort_by(|a, b| b.points.cmp(&a.points));
    rows
}

/// Row of the season classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonStanding {
    /// Display name shared by the aggregated entries.
    pub name: String,
    /// Points summed over every appearance.
    pub total_points: Points,
    /// Matchdays in which the name appeared.
    pub play_count: u32,
    /// `total_points / play_count`, one decimal.
    pub average: f64,
}

/// Season totals grouped by participant display name, best first.
///
/// Participant ids are only unique per matchday, so the name is the join key:
/// two entries sharing a name are the same contestant, and renaming one
/// splits its history.
pub fn season_classification(matchdays: &[MatchdayRecord]) -> Vec<SeasonStanding> {
    let mut rows: Vec<SeasonStanding> = Vec::new();
    let mut index: SlotIndex<String> = SlotIndex::new();
    let mut last_seen: Vec<usize> = Vec::new();

    for (md_idx, matchday) in matchdays.iter().enumerate() {
        for participant in &matchday.participants {
            let name = participant.display_name();
            let row_idx = match index.get(&name) {
                Some(i) => *i,
                None => {
                    index.insert(name.clone(), rows.len());
                    rows.push(SeasonStanding {
                        name,
                        total_points: 0,
                        play_count: 0,
                        average: 0.0,
                    });
                    last_seen.push(usize::MAX);
                    rows.len() - 1
                }
            };

            let row = &mut rows[row_idx];
            row.total_points = row
                .total_points
                .saturating_add(participant_points(participant, matchday));
            if last_seen[row_idx] != md_idx {
                last_seen[row_idx] = md_idx;
                row.play_count += 1;
            }
        }
    }

    for row in &mut rows {
        if row.play_count > 0 {
            row.average = round_one_decimal(row.total_points as f64 / f64::from(row.play_count));
        }
    }
    rows.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    rows
}

/// Roster ordering for the scores table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSortKey {
    /// Case-insensitive name.
    Name,
    /// Primary role, goalkeepers first.
    Role,
    /// Base points in the matchday.
    Points,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Roster ordered by `key`; ties keep roster order in either direction.
pub fn sorted_roster<'a>(
    players: &'a [Player],
    matchday: &MatchdayRecord,
    key: RosterSortKey,
    direction: SortDirection,
) -> Vec<&'a Player> {
    let mut out: Vec<&Player> = players.iter().collect();
    out.sort_by(|a, b| {
        let ord = match key {
            RosterSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            RosterSortKey::Role => a.primary_role().cmp(&b.primary_role()),
            RosterSortKey::Points => matchday.base_points(a.id).cmp(&matchday.base_points(b.id)),
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    out
}

/// Display lookup of player names for a set of ids; unknown ids are skipped.
pub fn player_names(players: &[Player], ids: &[PlayerId]) -> Vec<String> {
    let by_id = players_by_id(players);
    ids.iter()
        .filter_map(|id| by_id.get(id).map(|p| p.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_one_decimal(11.0 / 3.0), 3.7);
        assert_eq!(round_one_decimal(2.25), 2.3);
        assert_eq!(round_one_decimal(-0.25), -0.2);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }
}
