//! Unlocking: reopens a sealed timeline.

use async_trait::async_trait;
use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::power::Power;
use chronomancer_core::store::WorldStore;

use super::{HandlerOutcome, PowerHandler, applied, rejected};

/// Clears `is_locked` on the power's timeline when the actor holds an
/// `unlock` item.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlockHandler;

#[async_trait]
impl PowerHandler for UnlockHandler {
    async fn resolve(
        &self,
        power: &Power,
        store: &dyn WorldStore,
        clock: &dyn Clock,
    ) -> Result<HandlerOutcome, EngineError> {
        let actor = store.player(&power.player_id).await?;
        if !actor.holds_item("unlock") {
            return rejected(store, power, clock, "never had unlock item!").await;
        }

        store
            .set_timeline_locked(&power.timeline_name, false)
            .await?;
        applied(store, power, clock, "Has unlocked the timeline").await
    }
}
