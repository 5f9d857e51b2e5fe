//! Store change notifications.
//!
//! Every store mutation is mirrored as a [`ChangeEvent`] carrying JSON
//! snapshots of the record before and after. Fan-out transports subscribe to
//! these and filter per game; the engine itself never consumes them.

use serde::{Deserialize, Serialize};

/// The record collection a change happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Players,
    Timelines,
    Powers,
    Games,
    Messages,
}

/// One mutation observed in the store.
///
/// `old` is absent for inserts and `new` is absent for deletions; in-place
/// updates carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Where the change happened.
    pub collection: Collection,
    /// Snapshot before the change.
    pub old: Option<serde_json::Value>,
    /// Snapshot after the change.
    pub new: Option<serde_json::Value>,
}

impl ChangeEvent {
    /// Returns true if either snapshot belongs to the given game. Game
    /// records key on `id` rather than `gameId`.
    #[must_use]
    pub fn concerns_game(&self, game_id: &str) -> bool {
        let key = if self.collection == Collection::Games {
            "id"
        } else {
            "gameId"
        };
        [&self.old, &self.new].into_iter().any(|snapshot| {
            snapshot
                .as_ref()
                .and_then(|value| value.get(key))
                .and_then(serde_json::Value::as_str)
                == Some(game_id)
        })
    }
}
