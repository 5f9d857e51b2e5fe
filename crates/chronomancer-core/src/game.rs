//! Game records.

use serde::{Deserialize, Serialize};

/// A running game world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Unique game identifier.
    pub id: String,
    /// Set exactly once, by the first winning power to resolve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
}

impl Game {
    /// Creates a game with no winner yet.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            winner_id: None,
        }
    }

    /// Returns true once a winner has been recorded.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner_id.is_some()
    }
}
