//! Player records and their inventories.

use serde::{Deserialize, Serialize};

/// Maximum number of items a player can carry.
pub const INVENTORY_CAP: usize = 8;

/// Where an item came from. Items granted by quests and combinations are
/// traceable to a timeline and are stripped when that timeline is reset;
/// stolen items are untraceable and survive resets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemSource {
    /// Granted by the named timeline.
    Timeline(String),
    /// Not reclaimable by any timeline reset.
    Untraceable,
}

/// A carried item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item name, e.g. `lock` or `assist`.
    pub name: String,
    /// Provenance of the item.
    pub source: ItemSource,
}

impl Item {
    /// Creates an item granted by a timeline.
    #[must_use]
    pub fn from_timeline(name: impl Into<String>, timeline_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ItemSource::Timeline(timeline_name.into()),
        }
    }

    /// Creates an item with no reclaimable provenance.
    #[must_use]
    pub fn untraceable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ItemSource::Untraceable,
        }
    }
}

/// A participant in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Opaque identity issued by the authentication layer.
    pub id: String,
    /// The game this player belongs to.
    pub game_id: String,
    /// Display name.
    pub name: String,
    /// Profile picture URL.
    pub picture: String,
    /// Carried items, in acquisition order.
    pub items: Vec<Item>,
    /// Remaining action budget.
    pub actions: u32,
}

impl Player {
    /// Returns true if the player carries at least one item with this name.
    #[must_use]
    pub fn holds_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    /// Returns true if the inventory can take one more item.
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.items.len() < INVENTORY_CAP
    }

    /// Removes the first item with this name, returning it if present.
    pub fn remove_item_named(&mut self, name: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.name == name)?;
        Some(self.items.remove(index))
    }

    /// Drops every item granted by the named timeline, keeping the rest in
    /// order. Untraceable items are never dropped.
    pub fn remove_items_from(&mut self, timeline_name: &str) {
        self.items.retain(|item| match &item.source {
            ItemSource::Timeline(source) => source != timeline_name,
            ItemSource::Untraceable => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with_items(items: Vec<Item>) -> Player {
        Player {
            id: "1".to_owned(),
            game_id: "1".to_owned(),
            name: "Tester".to_owned(),
            picture: String::new(),
            items,
            actions: 10,
        }
    }

    #[test]
    fn test_holds_item_matches_by_name_regardless_of_source() {
        // Arrange
        let player = player_with_items(vec![
            Item::from_timeline("lock", "Timeline 2"),
            Item::untraceable("steal"),
        ]);

        // Act / Assert
        assert!(player.holds_item("lock"));
        assert!(player.holds_item("steal"));
        assert!(!player.holds_item("unlock"));
    }

    #[test]
    fn test_has_room_respects_inventory_cap() {
        // Arrange
        let mut player = player_with_items(vec![]);
        assert!(player.has_room());

        // Act
        for _ in 0..INVENTORY_CAP {
            player.items.push(Item::untraceable("assist"));
        }

        // Assert
        assert!(!player.has_room());
    }

    #[test]
    fn test_remove_item_named_removes_only_the_first_match() {
        // Arrange
        let mut player = player_with_items(vec![
            Item::from_timeline("assist", "Timeline 2"),
            Item::from_timeline("assist", "Timeline 3"),
        ]);

        // Act
        let removed = player.remove_item_named("assist");

        // Assert
        assert_eq!(removed, Some(Item::from_timeline("assist", "Timeline 2")));
        assert_eq!(player.items, vec![Item::from_timeline("assist", "Timeline 3")]);
    }

    #[test]
    fn test_remove_item_named_returns_none_when_absent() {
        // Arrange
        let mut player = player_with_items(vec![Item::untraceable("lock")]);

        // Act
        let removed = player.remove_item_named("unlock");

        // Assert
        assert_eq!(removed, None);
        assert_eq!(player.items.len(), 1);
    }

    #[test]
    fn test_remove_items_from_keeps_untraceable_and_foreign_items() {
        // Arrange
        let mut player = player_with_items(vec![
            Item::from_timeline("steal", "Timeline 1"),
            Item::from_timeline("lock", "Timeline 3"),
            Item::untraceable("unlock"),
        ]);

        // Act
        player.remove_items_from("Timeline 1");

        // Assert
        assert_eq!(
            player.items,
            vec![
                Item::from_timeline("lock", "Timeline 3"),
                Item::untraceable("unlock"),
            ]
        );
    }
}
