//! Locking: seals a timeline against membership churn.

use async_trait::async_trait;
use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::power::Power;
use chronomancer_core::store::WorldStore;

use super::{HandlerOutcome, PowerHandler, applied, rejected};

/// Sets `is_locked` on the power's timeline when the actor holds a `lock`
/// item.
#[derive(Debug, Default, Clone, Copy)]
pub struct LockHandler;

#[async_trait]
impl PowerHandler for LockHandler {
    async fn resolve(
        &self,
        power: &Power,
        store: &dyn WorldStore,
        clock: &dyn Clock,
    ) -> Result<HandlerOutcome, EngineError> {
        let actor = store.player(&power.player_id).await?;
        if !actor.holds_item("lock") {
            return rejected(store, power, clock, "never had lock item!").await;
        }

        store.set_timeline_locked(&power.timeline_name, true).await?;
        applied(store, power, clock, "Has locked the timeline").await
    }
}
