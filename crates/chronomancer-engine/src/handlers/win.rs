//! Winning: ends the game for the actor holding both keys.

use async_trait::async_trait;
use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::power::Power;
use chronomancer_core::store::WorldStore;

use super::{HandlerOutcome, PowerHandler, applied, rejected};

/// Sets the game's winner to the actor when they hold both `lock` and
/// `unlock`. The store only accepts the first winner.
#[derive(Debug, Default, Clone, Copy)]
pub struct WinHandler;

#[async_trait]
impl PowerHandler for WinHandler {
    async fn resolve(
        &self,
        power: &Power,
        store: &dyn WorldStore,
        clock: &dyn Clock,
    ) -> Result<HandlerOutcome, EngineError> {
        let actor = store.player(&power.player_id).await?;
        if !(actor.holds_item("lock") && actor.holds_item("unlock")) {
            return rejected(store, power, clock, "never had required items!").await;
        }

        // The loser of a photo finish gets no message of its own; the games
        // feed already announces the ending.
        if store
            .set_game_winner(&power.game_id, &power.player_id)
            .await?
        {
            applied(store, power, clock, "Has won the game!").await
        } else {
            Ok(HandlerOutcome::Rejected("game already has a winner"))
        }
    }
}
