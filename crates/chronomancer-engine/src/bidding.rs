//! Bid recording against pending powers.
//!
//! A bid locates the power by its `(game, timeline, actor)` triple and adds
//! one point of weight to the bidder's entry in the chosen list. The store
//! applies each bid as a single read-modify-write, so concurrent bids on the
//! same power never lose updates.

use chronomancer_core::error::EngineError;
use chronomancer_core::power::Stance;
use chronomancer_core::store::WorldStore;

/// Records a supporting bid on the pending power raised by `actor_id` on
/// the named timeline. Returns false when no such power is pending.
///
/// # Errors
///
/// Returns an error when the store cannot apply the bid.
pub async fn add_ally(
    store: &dyn WorldStore,
    game_id: &str,
    timeline_name: &str,
    actor_id: &str,
    bidder_id: &str,
) -> Result<bool, EngineError> {
    store
        .add_power_bid(game_id, timeline_name, actor_id, Stance::Ally, bidder_id)
        .await
}

/// Records an opposing bid on the pending power raised by `actor_id` on
/// the named timeline. Returns false when no such power is pending.
///
/// # Errors
///
/// Returns an error when the store cannot apply the bid.
pub async fn add_enemy(
    store: &dyn WorldStore,
    game_id: &str,
    timeline_name: &str,
    actor_id: &str,
    bidder_id: &str,
) -> Result<bool, EngineError> {
    store
        .add_power_bid(game_id, timeline_name, actor_id, Stance::Enemy, bidder_id)
        .await
}
