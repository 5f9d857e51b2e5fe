//! Combining: forges a stronger item out of two held prerequisites.

use async_trait::async_trait;
use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::player::Item;
use chronomancer_core::power::{Power, PowerTarget};
use chronomancer_core::store::WorldStore;

use super::{HandlerOutcome, PowerHandler, applied, corrupt, rejected};

/// The two items that must be held to forge the derived one. Prerequisites
/// are proof of capability, not fuel; they stay in the inventory.
fn prerequisites(derived: &str) -> Option<(&'static str, &'static str)> {
    match derived {
        "lock" => Some(("assist", "prevent")),
        "unlock" => Some(("steal", "reset")),
        _ => None,
    }
}

/// Grants the derived item, sourced from the power's timeline, when the
/// actor holds both prerequisites and has room for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct CombineHandler;

#[async_trait]
impl PowerHandler for CombineHandler {
    async fn resolve(
        &self,
        power: &Power,
        store: &dyn WorldStore,
        clock: &dyn Clock,
    ) -> Result<HandlerOutcome, EngineError> {
        let derived = power
            .target
            .as_ref()
            .and_then(PowerTarget::item_name)
            .ok_or_else(|| corrupt(power, "combining requires a target item name"))?;
        let (first, second) = prerequisites(derived)
            .ok_or_else(|| corrupt(power, &format!("no combination yields item {derived}")))?;

        let actor = store.player(&power.player_id).await?;
        if !(actor.holds_item(first) && actor.holds_item(second)) {
            return rejected(store, power, clock, "never had required items!").await;
        }
        if !actor.has_room() {
            return rejected(store, power, clock, "never had room for item!").await;
        }

        store
            .grant_item(
                &power.player_id,
                Item::from_timeline(derived, &power.timeline_name),
            )
            .await?;

        applied(
            store,
            power,
            clock,
            format!("Has combined items and got the {derived} item"),
        )
        .await
    }
}
