//! Engine error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for resolution and store operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A player record was not found. Players are never deleted during a
    /// game, so a missing record indicates store corruption.
    #[error("player not found: {0}")]
    PlayerNotFound(String),

    /// A timeline record was not found.
    #[error("timeline not found: {0}")]
    TimelineNotFound(String),

    /// A game record was not found.
    #[error("game not found: {0}")]
    GameNotFound(String),

    /// A power carries data its handler cannot act on, such as a stealing
    /// power without a player target or a combining power whose target item
    /// derives from no known recipe.
    #[error("corrupt power {power_id}: {reason}")]
    CorruptPower {
        /// The power that could not be resolved.
        power_id: Uuid,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An infrastructure/store error.
    #[error("store error: {0}")]
    Store(String),
}
