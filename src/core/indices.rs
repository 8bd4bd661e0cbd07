use hashbrown::HashMap;

use crate::{model::Player, types::PlayerId};

/// Position of each key in an output vector, for order-preserving grouping.
pub type SlotIndex<K> = HashMap<K, usize>;

/// Roster lookup by player id.
pub fn players_by_id(players: &[Player]) -> HashMap<PlayerId, &Player> {
    players.iter().map(|p| (p.id, p)).collect()
}
