//! In-memory implementation of the `WorldStore` trait.
//!
//! This is the reference store the engine is tested against. Every trait
//! method takes the state lock exactly once; that single acquisition is what
//! makes each operation atomic. Mutations are mirrored onto a broadcast
//! channel as [`ChangeEvent`]s so fan-out transports can follow the world
//! without polling.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chronomancer_core::change::{ChangeEvent, Collection};
use chronomancer_core::error::EngineError;
use chronomancer_core::game::Game;
use chronomancer_core::message::Message;
use chronomancer_core::player::{Item, Player};
use chronomancer_core::power::{Power, Stance};
use chronomancer_core::store::WorldStore;
use chronomancer_core::timeline::Timeline;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Change events buffered per lagging subscriber before it starts losing
/// them.
const CHANGE_FEED_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct WorldState {
    players: BTreeMap<String, Player>,
    timelines: BTreeMap<String, Timeline>,
    powers: BTreeMap<Uuid, Power>,
    games: BTreeMap<String, Game>,
    messages: Vec<Message>,
}

/// In-memory world store with a change feed.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<WorldState>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            state: Mutex::new(WorldState::default()),
            changes,
        }
    }

    /// Subscribes to the change feed. Events published before this call are
    /// not replayed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, WorldState>, EngineError> {
        self.state
            .lock()
            .map_err(|_| EngineError::Store("state lock poisoned".into()))
    }

    fn emit<T: Serialize>(
        &self,
        collection: Collection,
        old: Option<&T>,
        new: Option<&T>,
    ) -> Result<(), EngineError> {
        let snapshot = |record: Option<&T>| {
            record
                .map(serde_json::to_value)
                .transpose()
                .map_err(|error| EngineError::Store(error.to_string()))
        };
        let event = ChangeEvent {
            collection,
            old: snapshot(old)?,
            new: snapshot(new)?,
        };
        // A send error only means nobody is subscribed right now.
        let _ = self.changes.send(event);
        Ok(())
    }

    /// Seeds a player record.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the change event cannot be published.
    pub fn insert_player(&self, player: Player) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        self.emit(Collection::Players, None, Some(&player))?;
        state.players.insert(player.id.clone(), player);
        Ok(())
    }

    /// Seeds a timeline record.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the change event cannot be published.
    pub fn insert_timeline(&self, timeline: Timeline) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        self.emit(Collection::Timelines, None, Some(&timeline))?;
        state.timelines.insert(timeline.name.clone(), timeline);
        Ok(())
    }

    /// Seeds a game record.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the change event cannot be published.
    pub fn insert_game(&self, game: Game) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        self.emit(Collection::Games, None, Some(&game))?;
        state.games.insert(game.id.clone(), game);
        Ok(())
    }

    /// Inserts a submitted power.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the change event cannot be published.
    pub fn insert_power(&self, power: Power) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        self.emit(Collection::Powers, None, Some(&power))?;
        state.powers.insert(power.id, power);
        Ok(())
    }

    /// Marks every message up to and including the given instant as read by
    /// the player. Already-read messages are left alone.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if a change event cannot be published.
    pub fn mark_messages_read(
        &self,
        player_id: &str,
        up_to: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        let mut updates = Vec::new();
        for message in &mut state.messages {
            if message.start_time <= up_to && !message.read_by.iter().any(|id| id == player_id) {
                let before = message.clone();
                message.read_by.push(player_id.to_owned());
                updates.push((before, message.clone()));
            }
        }
        for (before, after) in &updates {
            self.emit(Collection::Messages, Some(before), Some(after))?;
        }
        Ok(())
    }

    /// Snapshot of every message, in append order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the state lock is poisoned.
    pub fn messages(&self) -> Result<Vec<Message>, EngineError> {
        Ok(self.lock_state()?.messages.clone())
    }

    /// Snapshot of every pending power.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the state lock is poisoned.
    pub fn powers(&self) -> Result<Vec<Power>, EngineError> {
        Ok(self.lock_state()?.powers.values().cloned().collect())
    }
}

#[async_trait]
impl WorldStore for MemoryStore {
    async fn player(&self, player_id: &str) -> Result<Player, EngineError> {
        let state = self.lock_state()?;
        state
            .players
            .get(player_id)
            .cloned()
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_owned()))
    }

    async fn timeline(&self, name: &str) -> Result<Option<Timeline>, EngineError> {
        Ok(self.lock_state()?.timelines.get(name).cloned())
    }

    async fn game(&self, game_id: &str) -> Result<Game, EngineError> {
        let state = self.lock_state()?;
        state
            .games
            .get(game_id)
            .cloned()
            .ok_or_else(|| EngineError::GameNotFound(game_id.to_owned()))
    }

    async fn find_power(
        &self,
        game_id: &str,
        timeline_name: &str,
        actor_id: &str,
    ) -> Result<Option<Power>, EngineError> {
        let state = self.lock_state()?;
        Ok(state
            .powers
            .values()
            .find(|power| {
                power.game_id == game_id
                    && power.timeline_name == timeline_name
                    && power.player_id == actor_id
            })
            .cloned())
    }

    async fn powers_due(
        &self,
        game_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Power>, EngineError> {
        let state = self.lock_state()?;
        Ok(state
            .powers
            .values()
            .filter(|power| power.game_id == game_id && power.is_due(now))
            .cloned()
            .collect())
    }

    async fn grant_item(&self, player_id: &str, item: Item) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        let player = state
            .players
            .get_mut(player_id)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_owned()))?;
        let before = player.clone();
        player.items.push(item);
        let after = player.clone();
        self.emit(Collection::Players, Some(&before), Some(&after))
    }

    async fn take_item(
        &self,
        player_id: &str,
        item_name: &str,
    ) -> Result<Option<Item>, EngineError> {
        let mut state = self.lock_state()?;
        let player = state
            .players
            .get_mut(player_id)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_owned()))?;
        let before = player.clone();
        let Some(item) = player.remove_item_named(item_name) else {
            return Ok(None);
        };
        let after = player.clone();
        self.emit(Collection::Players, Some(&before), Some(&after))?;
        Ok(Some(item))
    }

    async fn remove_items_from_source(
        &self,
        player_id: &str,
        timeline_name: &str,
    ) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        let player = state
            .players
            .get_mut(player_id)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_owned()))?;
        let before = player.clone();
        player.remove_items_from(timeline_name);
        if player.items.len() == before.items.len() {
            return Ok(());
        }
        let after = player.clone();
        self.emit(Collection::Players, Some(&before), Some(&after))
    }

    async fn set_timeline_locked(&self, name: &str, locked: bool) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        let timeline = state
            .timelines
            .get_mut(name)
            .ok_or_else(|| EngineError::TimelineNotFound(name.to_owned()))?;
        if timeline.is_locked == locked {
            return Ok(());
        }
        let before = timeline.clone();
        timeline.is_locked = locked;
        let after = timeline.clone();
        self.emit(Collection::Timelines, Some(&before), Some(&after))
    }

    async fn set_timeline_players(
        &self,
        name: &str,
        players: Vec<String>,
    ) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        let timeline = state
            .timelines
            .get_mut(name)
            .ok_or_else(|| EngineError::TimelineNotFound(name.to_owned()))?;
        if timeline.players == players {
            return Ok(());
        }
        let before = timeline.clone();
        timeline.players = players;
        let after = timeline.clone();
        self.emit(Collection::Timelines, Some(&before), Some(&after))
    }

    async fn add_power_bid(
        &self,
        game_id: &str,
        timeline_name: &str,
        actor_id: &str,
        stance: Stance,
        bidder_id: &str,
    ) -> Result<bool, EngineError> {
        let mut state = self.lock_state()?;
        let Some(power) = state.powers.values_mut().find(|power| {
            power.game_id == game_id
                && power.timeline_name == timeline_name
                && power.player_id == actor_id
        }) else {
            return Ok(false);
        };
        let before = power.clone();
        power.record_stance(stance, bidder_id);
        let after = power.clone();
        self.emit(Collection::Powers, Some(&before), Some(&after))?;
        Ok(true)
    }

    async fn set_game_winner(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<bool, EngineError> {
        let mut state = self.lock_state()?;
        let game = state
            .games
            .get_mut(game_id)
            .ok_or_else(|| EngineError::GameNotFound(game_id.to_owned()))?;
        if game.winner_id.is_some() {
            return Ok(false);
        }
        let before = game.clone();
        game.winner_id = Some(player_id.to_owned());
        let after = game.clone();
        self.emit(Collection::Games, Some(&before), Some(&after))?;
        Ok(true)
    }

    async fn append_message(&self, message: Message) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        self.emit(Collection::Messages, None, Some(&message))?;
        state.messages.push(message);
        Ok(())
    }

    async fn delete_power(&self, power_id: Uuid) -> Result<(), EngineError> {
        let mut state = self.lock_state()?;
        match state.powers.remove(&power_id) {
            Some(power) => self.emit(Collection::Powers, Some(&power), None),
            None => Ok(()),
        }
    }
}
