//! World store abstraction.
//!
//! The engine is written against this trait rather than a storage engine.
//! Implementations must make each individual method atomic; the engine never
//! assumes cross-record transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EngineError;
use crate::game::Game;
use crate::message::Message;
use crate::player::{Item, Player};
use crate::power::{Power, Stance};
use crate::timeline::Timeline;

/// Storage seam for players, timelines, powers, games, and messages.
#[async_trait]
pub trait WorldStore: Send + Sync {
    /// Loads a player by id.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlayerNotFound` if no such player exists, or
    /// `EngineError::Store` on backend failure.
    async fn player(&self, player_id: &str) -> Result<Player, EngineError>;

    /// Loads a timeline by name, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` on backend failure.
    async fn timeline(&self, name: &str) -> Result<Option<Timeline>, EngineError>;

    /// Loads a game by id.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::GameNotFound` if no such game exists, or
    /// `EngineError::Store` on backend failure.
    async fn game(&self, game_id: &str) -> Result<Game, EngineError>;

    /// Finds the pending power submitted by `actor_id` in the named timeline,
    /// if any. Each actor holds at most one power per timeline.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` on backend failure.
    async fn find_power(
        &self,
        game_id: &str,
        timeline_name: &str,
        actor_id: &str,
    ) -> Result<Option<Power>, EngineError>;

    /// Returns every power in the game whose resolution window has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` on backend failure.
    async fn powers_due(
        &self,
        game_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Power>, EngineError>;

    /// Appends an item to a player's inventory.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlayerNotFound` if no such player exists, or
    /// `EngineError::Store` on backend failure.
    async fn grant_item(&self, player_id: &str, item: Item) -> Result<(), EngineError>;

    /// Atomically removes the first item with this name from a player's
    /// inventory, returning it. Returns `None`, mutating nothing, if the
    /// player does not hold such an item.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlayerNotFound` if no such player exists, or
    /// `EngineError::Store` on backend failure.
    async fn take_item(
        &self,
        player_id: &str,
        item_name: &str,
    ) -> Result<Option<Item>, EngineError>;

    /// Removes every item the named timeline granted from a player's
    /// inventory.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlayerNotFound` if no such player exists, or
    /// `EngineError::Store` on backend failure.
    async fn remove_items_from_source(
        &self,
        player_id: &str,
        timeline_name: &str,
    ) -> Result<(), EngineError>;

    /// Sets a timeline's locked flag.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::TimelineNotFound` if no such timeline exists, or
    /// `EngineError::Store` on backend failure.
    async fn set_timeline_locked(&self, name: &str, locked: bool) -> Result<(), EngineError>;

    /// Replaces a timeline's member list.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::TimelineNotFound` if no such timeline exists, or
    /// `EngineError::Store` on backend failure.
    async fn set_timeline_players(
        &self,
        name: &str,
        players: Vec<String>,
    ) -> Result<(), EngineError>;

    /// Applies one bid to the pending power matching `(game_id,
    /// timeline_name, actor_id)` as a single atomic read-modify-write.
    /// Returns whether a matching power existed.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` on backend failure.
    async fn add_power_bid(
        &self,
        game_id: &str,
        timeline_name: &str,
        actor_id: &str,
        stance: Stance,
        bidder_id: &str,
    ) -> Result<bool, EngineError>;

    /// Records the winner if the game has none yet. Returns `false`, mutating
    /// nothing, when another winner got there first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::GameNotFound` if no such game exists, or
    /// `EngineError::Store` on backend failure.
    async fn set_game_winner(&self, game_id: &str, player_id: &str)
    -> Result<bool, EngineError>;

    /// Appends an outcome message.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` on backend failure.
    async fn append_message(&self, message: Message) -> Result<(), EngineError>;

    /// Deletes a power. Deleting a power that is already gone is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` on backend failure.
    async fn delete_power(&self, power_id: Uuid) -> Result<(), EngineError>;
}
