//! Chronomancer Engine — power resolution.
//!
//! Responsible for scoring contested powers, recording bids, applying
//! timeline effects through per-kind handlers, and driving the periodic
//! resolution tick.

pub mod bidding;
pub mod handlers;
pub mod registry;
pub mod scheduler;
pub mod scoring;
