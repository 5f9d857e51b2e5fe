//! Effect handlers, one per action kind.
//!
//! A handler receives a power that already cleared the scheduler's score and
//! staleness gates. It re-fetches whatever world state it touches (the power
//! snapshot is minutes old by now), checks its preconditions in a fixed
//! order, applies at most one effect, and records the outcome as a message.
//! Handlers never delete the power; the scheduler owns that.

use async_trait::async_trait;
use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::message::Message;
use chronomancer_core::power::Power;
use chronomancer_core::store::WorldStore;

mod combine;
mod lock;
mod reset;
mod steal;
mod unlock;
mod win;

pub use combine::CombineHandler;
pub use lock::LockHandler;
pub use reset::ResetHandler;
pub use steal::StealHandler;
pub use unlock::UnlockHandler;
pub use win::WinHandler;

/// What a handler did with a due power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Preconditions held and the effect was applied.
    Applied,
    /// A precondition failed; the world was left untouched.
    Rejected(&'static str),
}

/// Resolves one kind of power against current world state.
#[async_trait]
pub trait PowerHandler: Send + Sync {
    /// Checks preconditions and applies the power's effect.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails or the power's target data is
    /// corrupt. Precondition failures are not errors; they come back as
    /// [`HandlerOutcome::Rejected`].
    async fn resolve(
        &self,
        power: &Power,
        store: &dyn WorldStore,
        clock: &dyn Clock,
    ) -> Result<HandlerOutcome, EngineError>;
}

/// Records a success message and reports the effect as applied.
pub(crate) async fn applied(
    store: &dyn WorldStore,
    power: &Power,
    clock: &dyn Clock,
    text: impl Into<String> + Send,
) -> Result<HandlerOutcome, EngineError> {
    store
        .append_message(Message::new(
            power.game_id.as_str(),
            power.player_id.as_str(),
            power.timeline_name.as_str(),
            text,
            clock.now(),
        ))
        .await?;
    Ok(HandlerOutcome::Applied)
}

/// Records a failure message, prefixed with the power's stored name, and
/// reports the rejection.
pub(crate) async fn rejected(
    store: &dyn WorldStore,
    power: &Power,
    clock: &dyn Clock,
    reason: &'static str,
) -> Result<HandlerOutcome, EngineError> {
    store
        .append_message(Message::new(
            power.game_id.as_str(),
            power.player_id.as_str(),
            power.timeline_name.as_str(),
            format!("Failed while {}: {reason}", power.name),
            clock.now(),
        ))
        .await?;
    Ok(HandlerOutcome::Rejected(reason))
}

fn corrupt(power: &Power, reason: &str) -> EngineError {
    EngineError::CorruptPower {
        power_id: power.id,
        reason: reason.to_owned(),
    }
}
