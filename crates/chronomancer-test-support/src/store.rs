//! Test stores — a `WorldStore` that always fails, and one that fails for
//! a single player, for error-path and isolation tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chronomancer_core::error::EngineError;
use chronomancer_core::game::Game;
use chronomancer_core::message::Message;
use chronomancer_core::player::{Item, Player};
use chronomancer_core::power::{Power, Stance};
use chronomancer_core::store::WorldStore;
use chronomancer_core::timeline::Timeline;
use uuid::Uuid;

/// A world store that returns a store error from every operation.
#[derive(Debug)]
pub struct FailingStore;

fn refused<T>() -> Result<T, EngineError> {
    Err(EngineError::Store("connection refused".into()))
}

#[async_trait]
impl WorldStore for FailingStore {
    async fn player(&self, _player_id: &str) -> Result<Player, EngineError> {
        refused()
    }

    async fn timeline(&self, _name: &str) -> Result<Option<Timeline>, EngineError> {
        refused()
    }

    async fn game(&self, _game_id: &str) -> Result<Game, EngineError> {
        refused()
    }

    async fn find_power(
        &self,
        _game_id: &str,
        _timeline_name: &str,
        _actor_id: &str,
    ) -> Result<Option<Power>, EngineError> {
        refused()
    }

    async fn powers_due(
        &self,
        _game_id: &str,
        _now: DateTime<Utc>,
    ) -> Result<Vec<Power>, EngineError> {
        refused()
    }

    async fn grant_item(&self, _player_id: &str, _item: Item) -> Result<(), EngineError> {
        refused()
    }

    async fn take_item(
        &self,
        _player_id: &str,
        _item_name: &str,
    ) -> Result<Option<Item>, EngineError> {
        refused()
    }

    async fn remove_items_from_source(
        &self,
        _player_id: &str,
        _timeline_name: &str,
    ) -> Result<(), EngineError> {
        refused()
    }

    async fn set_timeline_locked(&self, _name: &str, _locked: bool) -> Result<(), EngineError> {
        refused()
    }

    async fn set_timeline_players(
        &self,
        _name: &str,
        _players: Vec<String>,
    ) -> Result<(), EngineError> {
        refused()
    }

    async fn add_power_bid(
        &self,
        _game_id: &str,
        _timeline_name: &str,
        _actor_id: &str,
        _stance: Stance,
        _bidder_id: &str,
    ) -> Result<bool, EngineError> {
        refused()
    }

    async fn set_game_winner(
        &self,
        _game_id: &str,
        _player_id: &str,
    ) -> Result<bool, EngineError> {
        refused()
    }

    async fn append_message(&self, _message: Message) -> Result<(), EngineError> {
        refused()
    }

    async fn delete_power(&self, _power_id: Uuid) -> Result<(), EngineError> {
        refused()
    }
}

/// A world store that fails lookups of one designated player and delegates
/// everything else to the wrapped store. Ruins exactly one power's
/// resolution, which is what isolation tests need.
pub struct FlakyStore {
    inner: Arc<dyn WorldStore>,
    poisoned_player: String,
}

impl FlakyStore {
    /// Wraps a store so that `player(player_id)` fails.
    pub fn failing_player(inner: Arc<dyn WorldStore>, player_id: impl Into<String>) -> Self {
        Self {
            inner,
            poisoned_player: player_id.into(),
        }
    }
}

#[async_trait]
impl WorldStore for FlakyStore {
    async fn player(&self, player_id: &str) -> Result<Player, EngineError> {
        if player_id == self.poisoned_player {
            return Err(EngineError::Store("connection reset by peer".into()));
        }
        self.inner.player(player_id).await
    }

    async fn timeline(&self, name: &str) -> Result<Option<Timeline>, EngineError> {
        self.inner.timeline(name).await
    }

    async fn game(&self, game_id: &str) -> Result<Game, EngineError> {
        self.inner.game(game_id).await
    }

    async fn find_power(
        &self,
        game_id: &str,
        timeline_name: &str,
        actor_id: &str,
    ) -> Result<Option<Power>, EngineError> {
        self.inner.find_power(game_id, timeline_name, actor_id).await
    }

    async fn powers_due(
        &self,
        game_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Power>, EngineError> {
        self.inner.powers_due(game_id, now).await
    }

    async fn grant_item(&self, player_id: &str, item: Item) -> Result<(), EngineError> {
        self.inner.grant_item(player_id, item).await
    }

    async fn take_item(
        &self,
        player_id: &str,
        item_name: &str,
    ) -> Result<Option<Item>, EngineError> {
        self.inner.take_item(player_id, item_name).await
    }

    async fn remove_items_from_source(
        &self,
        player_id: &str,
        timeline_name: &str,
    ) -> Result<(), EngineError> {
        self.inner
            .remove_items_from_source(player_id, timeline_name)
            .await
    }

    async fn set_timeline_locked(&self, name: &str, locked: bool) -> Result<(), EngineError> {
        self.inner.set_timeline_locked(name, locked).await
    }

    async fn set_timeline_players(
        &self,
        name: &str,
        players: Vec<String>,
    ) -> Result<(), EngineError> {
        self.inner.set_timeline_players(name, players).await
    }

    async fn add_power_bid(
        &self,
        game_id: &str,
        timeline_name: &str,
        actor_id: &str,
        stance: Stance,
        bidder_id: &str,
    ) -> Result<bool, EngineError> {
        self.inner
            .add_power_bid(game_id, timeline_name, actor_id, stance, bidder_id)
            .await
    }

    async fn set_game_winner(&self, game_id: &str, player_id: &str) -> Result<bool, EngineError> {
        self.inner.set_game_winner(game_id, player_id).await
    }

    async fn append_message(&self, message: Message) -> Result<(), EngineError> {
        self.inner.append_message(message).await
    }

    async fn delete_power(&self, power_id: Uuid) -> Result<(), EngineError> {
        self.inner.delete_power(power_id).await
    }
}
