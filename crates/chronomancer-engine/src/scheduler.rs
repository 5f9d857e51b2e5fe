//! The resolution scheduler: the periodic pass that settles due powers.
//!
//! Each pass queries the powers whose window has elapsed, fans them out as
//! concurrent tasks, and walks every one through the same pipeline: parse
//! the stored name, gate on support, gate on the actor still being in the
//! timeline, then dispatch to the kind's handler. Whatever branch a power
//! takes, the pass discards it; nothing is ever resolved twice.

use std::sync::Arc;
use std::time::Duration;

use chronomancer_core::clock::Clock;
use chronomancer_core::error::EngineError;
use chronomancer_core::message::Message;
use chronomancer_core::power::{ActionKind, Power};
use chronomancer_core::store::WorldStore;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::handlers::HandlerOutcome;
use crate::registry::HandlerRegistry;
use crate::scoring;

/// Default pause between resolution passes.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime settings for one scheduler instance.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// The game whose powers this scheduler settles.
    pub game_id: String,
    /// Pause between resolution passes.
    pub tick_interval: Duration,
}

impl SchedulerConfig {
    /// Settings for a game at the default tick interval.
    #[must_use]
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Overrides the tick interval.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` when the interval is zero.
    pub fn with_tick_interval(mut self, interval: Duration) -> Result<Self, EngineError> {
        if interval.is_zero() {
            return Err(EngineError::Config(
                "tick_interval must be positive".to_owned(),
            ));
        }
        self.tick_interval = interval;
        Ok(self)
    }

    /// Reads settings from the environment: `CHRONOMANCER_GAME_ID`
    /// (required) and `CHRONOMANCER_TICK_MS` (optional, default 1000).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` when the game id is missing or the
    /// tick override does not parse to a positive integer.
    pub fn from_env() -> Result<Self, EngineError> {
        let game_id = std::env::var("CHRONOMANCER_GAME_ID").map_err(|_| {
            EngineError::Config("CHRONOMANCER_GAME_ID environment variable must be set".to_owned())
        })?;
        let tick_ms: u64 = std::env::var("CHRONOMANCER_TICK_MS")
            .unwrap_or_else(|_| "1000".to_owned())
            .parse()
            .map_err(|e| {
                EngineError::Config(format!("CHRONOMANCER_TICK_MS must be an integer: {e}"))
            })?;
        Self::new(game_id).with_tick_interval(Duration::from_millis(tick_ms))
    }
}

/// How one power left the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Handler preconditions held and the effect was applied.
    Applied,
    /// A handler precondition failed.
    Rejected(&'static str),
    /// Not enough support to go through.
    RejectedScore,
    /// The actor was no longer in the timeline, or the timeline is gone.
    RejectedStale,
    /// The stored name parses to no known kind.
    RejectedUnknown,
    /// Evaluation failed partway; the power was still discarded.
    Failed(String),
}

/// What one resolution pass did, power by power.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Outcome per settled power.
    pub outcomes: Vec<(Uuid, Outcome)>,
}

impl TickReport {
    /// Number of powers whose effect was applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::Applied)
            .count()
    }

    /// Number of powers whose evaluation failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Failed(_)))
            .count()
    }

    /// Looks up the outcome recorded for a power.
    #[must_use]
    pub fn outcome_of(&self, power_id: Uuid) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == power_id)
            .map(|(_, outcome)| outcome)
    }
}

/// Drives resolution passes for one game.
pub struct Scheduler {
    store: Arc<dyn WorldStore>,
    registry: HandlerRegistry,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Builds a scheduler over a store, a handler table, and a clock.
    #[must_use]
    pub fn new(
        store: Arc<dyn WorldStore>,
        registry: HandlerRegistry,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
            config,
        }
    }

    /// Runs resolution passes forever at the configured interval. Missed
    /// ticks are skipped rather than bunched up. A failed pass is logged
    /// and retried on the next tick.
    pub async fn run(&self) {
        let mut ticks = tokio::time::interval(self.config.tick_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            match self.resolve_due_powers().await {
                Ok(report) if report.outcomes.is_empty() => {}
                Ok(report) => {
                    tracing::info!(
                        game_id = %self.config.game_id,
                        settled = report.outcomes.len(),
                        applied = report.applied(),
                        failed = report.failed(),
                        "resolution pass settled powers"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        game_id = %self.config.game_id,
                        %error,
                        "resolution pass failed, retrying next tick"
                    );
                }
            }
        }
    }

    /// Performs one resolution pass over every due power.
    ///
    /// Powers are settled concurrently with per-power isolation: one
    /// power's failure never blocks its siblings, and every power in the
    /// batch is discarded exactly once whatever its outcome.
    ///
    /// # Errors
    ///
    /// Returns an error only when the eligibility query itself fails;
    /// per-power failures are reported in the `TickReport` instead.
    pub async fn resolve_due_powers(&self) -> Result<TickReport, EngineError> {
        let now = self.clock.now();
        let due = self.store.powers_due(&self.config.game_id, now).await?;

        let mut tasks: JoinSet<(Uuid, Outcome)> = JoinSet::new();
        for power in due {
            let store = Arc::clone(&self.store);
            let registry = self.registry.clone();
            let clock = Arc::clone(&self.clock);
            tasks.spawn(settle(power, store, registry, clock));
        }

        let mut report = TickReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(settled) => report.outcomes.push(settled),
                Err(error) => {
                    tracing::warn!(%error, "resolution task aborted");
                }
            }
        }
        Ok(report)
    }
}

/// Settles one power and always discards it, whatever happened.
async fn settle(
    power: Power,
    store: Arc<dyn WorldStore>,
    registry: HandlerRegistry,
    clock: Arc<dyn Clock>,
) -> (Uuid, Outcome) {
    let outcome = match evaluate(&power, store.as_ref(), &registry, clock.as_ref()).await {
        Ok(outcome) => outcome,
        Err(error) => {
            tracing::warn!(power_id = %power.id, %error, "power evaluation failed");
            Outcome::Failed(error.to_string())
        }
    };
    if let Err(error) = store.delete_power(power.id).await {
        tracing::warn!(power_id = %power.id, %error, "failed to discard settled power");
    }
    (power.id, outcome)
}

/// Walks one power through the pipeline: parse, score gate, staleness
/// gate, dispatch.
async fn evaluate(
    power: &Power,
    store: &dyn WorldStore,
    registry: &HandlerRegistry,
    clock: &dyn Clock,
) -> Result<Outcome, EngineError> {
    // An unparseable name is a data condition, not an error: discard it
    // quietly. No message either, because no player action reads sensibly.
    let Some(kind) = ActionKind::parse(&power.name) else {
        tracing::warn!(
            power_id = %power.id,
            name = %power.name,
            "discarding power with unknown action name"
        );
        return Ok(Outcome::RejectedUnknown);
    };
    let Some(handler) = registry.get(kind) else {
        tracing::warn!(power_id = %power.id, %kind, "no handler bound for action kind");
        return Ok(Outcome::RejectedUnknown);
    };

    if !scoring::has_sufficient_support(power) {
        gate_message(store, power, clock, kind, "too much resistance").await?;
        return Ok(Outcome::RejectedScore);
    }

    let still_there = store
        .timeline(&power.timeline_name)
        .await?
        .is_some_and(|timeline| timeline.contains_player(&power.player_id));
    if !still_there {
        gate_message(store, power, clock, kind, "was never in timeline!").await?;
        return Ok(Outcome::RejectedStale);
    }

    match handler.resolve(power, store, clock).await? {
        HandlerOutcome::Applied => Ok(Outcome::Applied),
        HandlerOutcome::Rejected(reason) => Ok(Outcome::Rejected(reason)),
    }
}

/// Appends a pre-dispatch rejection message. These carry the lower-case
/// kind name, unlike handler failures which echo the stored power name.
async fn gate_message(
    store: &dyn WorldStore,
    power: &Power,
    clock: &dyn Clock,
    kind: ActionKind,
    reason: &str,
) -> Result<(), EngineError> {
    store
        .append_message(Message::new(
            power.game_id.as_str(),
            power.player_id.as_str(),
            power.timeline_name.as_str(),
            format!("Failed while {kind}: {reason}"),
            clock.now(),
        ))
        .await
}
