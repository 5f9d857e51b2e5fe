//! Resetting: evicts everyone but the actor and reclaims granted items.

use async_trait::async_trait;
use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::power::Power;
use chronomancer_core::store::WorldStore;

use super::{HandlerOutcome, PowerHandler, applied, rejected};

/// Shrinks the timeline's membership to the actor alone. Every evicted
/// member loses the items this timeline granted them; the actor keeps
/// theirs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResetHandler;

#[async_trait]
impl PowerHandler for ResetHandler {
    async fn resolve(
        &self,
        power: &Power,
        store: &dyn WorldStore,
        clock: &dyn Clock,
    ) -> Result<HandlerOutcome, EngineError> {
        let actor = store.player(&power.player_id).await?;
        if !actor.holds_item("reset") {
            return rejected(store, power, clock, "never had reset item!").await;
        }

        let timeline = store
            .timeline(&power.timeline_name)
            .await?
            .ok_or_else(|| EngineError::TimelineNotFound(power.timeline_name.clone()))?;

        for member in &timeline.players {
            if *member == power.player_id {
                continue;
            }
            store
                .remove_items_from_source(member, &power.timeline_name)
                .await?;
        }
        store
            .set_timeline_players(&power.timeline_name, vec![power.player_id.clone()])
            .await?;

        applied(store, power, clock, "Has reset the timeline").await
    }
}
