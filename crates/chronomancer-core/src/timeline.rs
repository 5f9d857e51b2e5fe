//! Timeline records.

use serde::{Deserialize, Serialize};

/// A shared zone players can join, lock, reset, and act against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Unique timeline name. Used as the record key.
    pub name: String,
    /// Item name this timeline grants on direct quest actions.
    #[serde(rename = "type")]
    pub grants: String,
    /// Member player ids, in join order.
    pub players: Vec<String>,
    /// Whether the timeline is currently locked.
    pub is_locked: bool,
    /// The game this timeline belongs to.
    pub game_id: String,
}

impl Timeline {
    /// Returns true if the player is currently a member.
    #[must_use]
    pub fn contains_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|member| member == player_id)
    }
}
