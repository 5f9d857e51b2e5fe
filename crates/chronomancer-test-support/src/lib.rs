//! Shared test doubles and fixtures for the Chronomancer resolution engine.

mod clock;
pub mod fixtures;
mod store;

pub use clock::FixedClock;
pub use store::{FailingStore, FlakyStore};
