//! Chronomancer Core — shared domain types and abstractions.
//!
//! This crate defines the world records (players, timelines, powers, games,
//! messages), the store trait the engine runs against, and the change
//! notification types consumed by fan-out transports. It contains no
//! infrastructure code.

pub mod change;
pub mod clock;
pub mod error;
pub mod game;
pub mod message;
pub mod player;
pub mod power;
pub mod store;
pub mod timeline;
