//! Support scoring for contested powers.
//!
//! A power starts with one point of momentum from its caster. Every ally
//! bid adds its score, every enemy bid subtracts its score, and the power
//! only takes effect while the margin stays positive.

use chronomancer_core::power::{Power, SupportEntry};

fn total(entries: &[SupportEntry]) -> i64 {
    entries.iter().map(|entry| i64::from(entry.score)).sum()
}

/// Computes the signed support margin of a power.
#[must_use]
pub fn support_margin(power: &Power) -> i64 {
    1 + total(&power.allies) - total(&power.enemies)
}

/// Returns true if the power has enough support to take effect.
#[must_use]
pub fn has_sufficient_support(power: &Power) -> bool {
    support_margin(power) > 0
}
