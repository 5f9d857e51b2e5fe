//! Stealing: lifts a named item off another player in the same timeline.

use async_trait::async_trait;
use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::player::Item;
use chronomancer_core::power::{Power, PowerTarget};
use chronomancer_core::store::WorldStore;

use super::{HandlerOutcome, PowerHandler, applied, corrupt, rejected};

/// Moves one item from the target player to the actor. The stolen copy
/// loses its provenance, so a later timeline reset cannot reclaim it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StealHandler;

#[async_trait]
impl PowerHandler for StealHandler {
    async fn resolve(
        &self,
        power: &Power,
        store: &dyn WorldStore,
        clock: &dyn Clock,
    ) -> Result<HandlerOutcome, EngineError> {
        let (target_id, item_name) = match &power.target {
            Some(PowerTarget::Player {
                id,
                item_name: Some(item_name),
            }) => (id.as_str(), item_name.as_str()),
            _ => {
                return Err(corrupt(
                    power,
                    "stealing requires a player target with an item name",
                ));
            }
        };

        let actor = store.player(&power.player_id).await?;
        if !actor.holds_item("steal") {
            return rejected(store, power, clock, "never had steal item!").await;
        }

        let target = store.player(target_id).await?;
        if !target.holds_item(item_name) {
            return rejected(store, power, clock, "target never had item!").await;
        }

        let timeline = store
            .timeline(&power.timeline_name)
            .await?
            .ok_or_else(|| EngineError::TimelineNotFound(power.timeline_name.clone()))?;
        if !timeline.contains_player(target_id) {
            return rejected(store, power, clock, "target was never in timeline!").await;
        }

        if !actor.has_room() {
            return rejected(store, power, clock, "never had room for item!").await;
        }

        // A sibling resolution may race the item away between the check and
        // the take. Treat that exactly like the check failing.
        let Some(taken) = store.take_item(target_id, item_name).await? else {
            return rejected(store, power, clock, "target never had item!").await;
        };
        store
            .grant_item(&power.player_id, Item::untraceable(taken.name))
            .await?;

        applied(store, power, clock, "Has stolen an item").await
    }
}
