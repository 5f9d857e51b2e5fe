//! Pending contestable actions and their support lists.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of resolvable action kinds.
///
/// Power names are stored verbatim as submitted and parsed into a kind at
/// resolution time; names that parse to no kind are inert and their powers
/// are discarded without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Locking,
    Unlocking,
    Resetting,
    Stealing,
    Combining,
    Winning,
}

impl ActionKind {
    /// Parses a stored power name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "locking" => Some(Self::Locking),
            "unlocking" => Some(Self::Unlocking),
            "resetting" => Some(Self::Resetting),
            "stealing" => Some(Self::Stealing),
            "combining" => Some(Self::Combining),
            "winning" => Some(Self::Winning),
            _ => None,
        }
    }

    /// The canonical name in the form submitted powers carry.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Locking => "Locking",
            Self::Unlocking => "Unlocking",
            Self::Resetting => "Resetting",
            Self::Stealing => "Stealing",
            Self::Combining => "Combining",
            Self::Winning => "Winning",
        }
    }

    /// How long this kind of power stays open to bidding before it becomes
    /// eligible for resolution.
    #[must_use]
    pub const fn resolution_window(&self) -> Duration {
        match self {
            Self::Locking | Self::Unlocking => Duration::seconds(30),
            Self::Resetting | Self::Stealing => Duration::seconds(45),
            Self::Combining => Duration::seconds(60),
            Self::Winning => Duration::seconds(90),
        }
    }
}

impl std::fmt::Display for ActionKind {
    /// Prints the lower-case form used in pre-dispatch failure messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locking => write!(f, "locking"),
            Self::Unlocking => write!(f, "unlocking"),
            Self::Resetting => write!(f, "resetting"),
            Self::Stealing => write!(f, "stealing"),
            Self::Combining => write!(f, "combining"),
            Self::Winning => write!(f, "winning"),
        }
    }
}

/// Whether a bid backs or opposes a power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Ally,
    Enemy,
}

/// One bidder's accumulated influence on a power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportEntry {
    /// The bidding player.
    pub id: String,
    /// Accumulated bid count, at least 1.
    pub score: u32,
}

/// What a power acts on, beyond its own timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PowerTarget {
    /// A timeline target; combining powers carry the derived item name.
    #[serde(rename_all = "camelCase")]
    Timeline {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item_name: Option<String>,
    },
    /// A player target; stealing powers carry the coveted item name.
    #[serde(rename_all = "camelCase")]
    Player {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item_name: Option<String>,
    },
}

impl PowerTarget {
    /// The item name the power acts on, when one was submitted.
    #[must_use]
    pub fn item_name(&self) -> Option<&str> {
        match self {
            Self::Timeline { item_name, .. } | Self::Player { item_name, .. } => {
                item_name.as_deref()
            }
        }
    }
}

/// A delayed, contestable action pending resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Power {
    /// Unique power identifier.
    pub id: Uuid,
    /// The game this power belongs to.
    pub game_id: String,
    /// The acting player.
    pub player_id: String,
    /// Action name as submitted. Parsed case-insensitively at resolution.
    pub name: String,
    /// The timeline the action was declared in.
    pub timeline_name: String,
    /// Optional object of the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PowerTarget>,
    /// When the power was submitted.
    pub start_time: DateTime<Utc>,
    /// When the power becomes eligible for resolution.
    pub end_time: DateTime<Utc>,
    /// Backing bids, at most one entry per bidder.
    pub allies: Vec<SupportEntry>,
    /// Opposing bids, at most one entry per bidder.
    pub enemies: Vec<SupportEntry>,
}

impl Power {
    /// Creates a power the way the submission layer does: canonical name,
    /// fresh id, empty support lists, and an end time computed from the
    /// kind's resolution window.
    #[must_use]
    pub fn new(
        kind: ActionKind,
        game_id: impl Into<String>,
        player_id: impl Into<String>,
        timeline_name: impl Into<String>,
        target: Option<PowerTarget>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id: game_id.into(),
            player_id: player_id.into(),
            name: kind.name().to_owned(),
            timeline_name: timeline_name.into(),
            target,
            start_time,
            end_time: start_time + kind.resolution_window(),
            allies: Vec::new(),
            enemies: Vec::new(),
        }
    }

    /// Returns true once the resolution window has elapsed.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }

    /// Applies one bid: an existing entry for the bidder gains a point,
    /// otherwise a fresh entry starts at 1. Keeps the one-entry-per-bidder
    /// invariant.
    pub fn record_stance(&mut self, stance: Stance, bidder_id: &str) {
        let entries = match stance {
            Stance::Ally => &mut self.allies,
            Stance::Enemy => &mut self.enemies,
        };
        if let Some(entry) = entries.iter_mut().find(|entry| entry.id == bidder_id) {
            entry.score += 1;
        } else {
            entries.push(SupportEntry {
                id: bidder_id.to_owned(),
                score: 1,
            });
        }
    }
}
