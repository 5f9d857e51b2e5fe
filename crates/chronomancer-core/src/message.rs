//! Outcome messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player-facing record of what a resolution did or why it failed.
/// Messages are append-only; the only later mutation is read-marking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// The game this message belongs to.
    pub game_id: String,
    /// The acting player the message is about.
    pub player_id: String,
    /// The timeline the action happened in.
    pub timeline_name: String,
    /// Human-readable outcome text.
    pub text: String,
    /// When the message was created.
    pub start_time: DateTime<Utc>,
    /// Players who have read the message.
    pub read_by: Vec<String>,
}

impl Message {
    /// Creates an unread message with a fresh id.
    #[must_use]
    pub fn new(
        game_id: impl Into<String>,
        player_id: impl Into<String>,
        timeline_name: impl Into<String>,
        text: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id: game_id.into(),
            player_id: player_id.into(),
            timeline_name: timeline_name.into(),
            text: text.into(),
            start_time,
            read_by: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_message_starts_unread() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

        // Act
        let message = Message::new("1", "3", "Timeline 1", "Has locked the timeline", now);

        // Assert
        assert_eq!(message.game_id, "1");
        assert_eq!(message.text, "Has locked the timeline");
        assert_eq!(message.start_time, now);
        assert!(message.read_by.is_empty());
    }
}
