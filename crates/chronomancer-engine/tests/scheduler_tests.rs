//! Integration tests for the resolution scheduler over the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as Window, TimeZone, Utc};
use chronomancer_core::power::{ActionKind, Power, PowerTarget, Stance};
use chronomancer_core::store::WorldStore;
use chronomancer_engine::registry::HandlerRegistry;
use chronomancer_engine::scheduler::{Outcome, Scheduler, SchedulerConfig};
use chronomancer_store_memory::MemoryStore;
use chronomancer_test_support::{FailingStore, FixedClock, FlakyStore, fixtures};
use uuid::Uuid;

fn seed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn seeded_store(now: DateTime<Utc>) -> Arc<MemoryStore> {
    let world = fixtures::world(now);
    let store = MemoryStore::new();
    store.insert_game(world.game).unwrap();
    for timeline in world.timelines {
        store.insert_timeline(timeline).unwrap();
    }
    for player in world.players {
        store.insert_player(player).unwrap();
    }
    for power in world.powers {
        store.insert_power(power).unwrap();
    }
    Arc::new(store)
}

fn scheduler_over(store: Arc<dyn WorldStore>, now: DateTime<Utc>) -> Scheduler {
    Scheduler::new(
        store,
        HandlerRegistry::standard(),
        Arc::new(FixedClock(now)),
        SchedulerConfig::new(fixtures::GAME_ID),
    )
}

/// A power whose window elapsed well before the fixture instant.
fn due_power(kind: ActionKind, actor_id: &str, timeline_name: &str, now: DateTime<Utc>) -> Power {
    Power::new(
        kind,
        fixtures::GAME_ID,
        actor_id,
        timeline_name,
        None,
        now - Window::minutes(5),
    )
}

fn message_texts(store: &MemoryStore) -> Vec<String> {
    store
        .messages()
        .unwrap()
        .into_iter()
        .map(|message| message.text)
        .collect()
}

// --- batch resolution ---

#[tokio::test]
async fn test_due_powers_are_settled_and_discarded() {
    let now = seed_time();
    let store = seeded_store(now);
    let scheduler = scheduler_over(store.clone(), now + Window::seconds(2));

    let report = scheduler.resolve_due_powers().await.unwrap();

    // Three powers brewed in Timeline 6; only the reset by player 3 can
    // apply, and it leaves the actor as the sole member.
    let timeline = store.timeline("Timeline 6").await.unwrap().unwrap();
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.applied(), 1);
    assert!(store.powers().unwrap().is_empty());
    assert_eq!(timeline.players, vec!["3".to_owned()]);

    let texts = message_texts(&store);
    assert_eq!(texts.len(), 3);
    assert!(texts.contains(&"Has reset the timeline".to_owned()));
}

#[tokio::test]
async fn test_pending_powers_are_left_brewing() {
    let now = seed_time();
    let store = seeded_store(now);
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    assert!(report.outcomes.is_empty());
    assert_eq!(store.powers().unwrap().len(), 3);
    assert!(store.messages().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_pass_finds_nothing_left() {
    let now = seed_time();
    let store = seeded_store(now);
    let scheduler = scheduler_over(store.clone(), now + Window::seconds(2));

    scheduler.resolve_due_powers().await.unwrap();
    let second = scheduler.resolve_due_powers().await.unwrap();

    assert!(second.outcomes.is_empty());
    assert_eq!(message_texts(&store).len(), 3);
}

#[tokio::test]
async fn test_query_failure_fails_the_whole_tick() {
    let scheduler = scheduler_over(Arc::new(FailingStore), seed_time());

    let result = scheduler.resolve_due_powers().await;

    assert!(result.is_err());
}

// --- pre-dispatch gates ---

#[tokio::test]
async fn test_overwhelmed_power_is_rejected_for_resistance() {
    let now = seed_time();
    let store = seeded_store(now);
    let mut power = due_power(ActionKind::Locking, "3", "Timeline 1", now);
    power.record_stance(Stance::Enemy, "1");
    power.record_stance(Stance::Enemy, "1");
    let power_id = power.id;
    store.insert_power(power).unwrap();
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    let timeline = store.timeline("Timeline 1").await.unwrap().unwrap();
    assert_eq!(report.outcome_of(power_id), Some(&Outcome::RejectedScore));
    assert!(!timeline.is_locked);
    assert_eq!(
        message_texts(&store),
        vec!["Failed while locking: too much resistance".to_owned()]
    );
    assert!(store.powers().unwrap().iter().all(|p| p.id != power_id));
}

#[tokio::test]
async fn test_evicted_actor_is_rejected_as_stale() {
    let now = seed_time();
    let store = seeded_store(now);
    // Player 4 holds a lock item but is not in Timeline 9.
    let power = due_power(ActionKind::Locking, "4", "Timeline 9", now);
    let power_id = power.id;
    store.insert_power(power).unwrap();
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    let timeline = store.timeline("Timeline 9").await.unwrap().unwrap();
    assert_eq!(report.outcome_of(power_id), Some(&Outcome::RejectedStale));
    assert!(!timeline.is_locked);
    assert_eq!(
        message_texts(&store),
        vec!["Failed while locking: was never in timeline!".to_owned()]
    );
}

#[tokio::test]
async fn test_vanished_timeline_is_rejected_as_stale() {
    let now = seed_time();
    let store = seeded_store(now);
    let power = due_power(ActionKind::Unlocking, "3", "Timeline 55", now);
    let power_id = power.id;
    store.insert_power(power).unwrap();
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    assert_eq!(report.outcome_of(power_id), Some(&Outcome::RejectedStale));
    assert_eq!(
        message_texts(&store),
        vec!["Failed while unlocking: was never in timeline!".to_owned()]
    );
}

// --- malformed powers ---

#[tokio::test]
async fn test_unknown_action_name_is_discarded_without_a_message() {
    let now = seed_time();
    let store = seeded_store(now);
    let dancing = Power {
        id: Uuid::new_v4(),
        game_id: fixtures::GAME_ID.to_owned(),
        player_id: "3".to_owned(),
        name: "Dancing".to_owned(),
        timeline_name: "Timeline 1".to_owned(),
        target: None,
        start_time: now - Window::minutes(5),
        end_time: now - Window::minutes(4),
        allies: Vec::new(),
        enemies: Vec::new(),
    };
    let dancing_id = dancing.id;
    let sibling = due_power(ActionKind::Locking, "3", "Timeline 1", now);
    let sibling_id = sibling.id;
    store.insert_power(dancing).unwrap();
    store.insert_power(sibling).unwrap();
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    // The unknown power dies quietly; its sibling still resolves. Only the
    // three not-yet-due fixture powers survive the pass.
    let timeline = store.timeline("Timeline 1").await.unwrap().unwrap();
    assert_eq!(report.outcome_of(dancing_id), Some(&Outcome::RejectedUnknown));
    assert_eq!(report.outcome_of(sibling_id), Some(&Outcome::Applied));
    assert!(timeline.is_locked);
    assert_eq!(
        message_texts(&store),
        vec!["Has locked the timeline".to_owned()]
    );
    assert_eq!(store.powers().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stored_name_parses_insensitively_and_is_echoed_verbatim() {
    let now = seed_time();
    let store = seeded_store(now);
    let mut power = due_power(ActionKind::Locking, "1", "Timeline 1", now);
    power.name = "loCkIng".to_owned();
    let power_id = power.id;
    store.insert_power(power).unwrap();
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    // Player 1 carries nothing, so the handler rejects; the failure message
    // echoes the name exactly as it was stored.
    assert_eq!(
        report.outcome_of(power_id),
        Some(&Outcome::Rejected("never had lock item!"))
    );
    assert_eq!(
        message_texts(&store),
        vec!["Failed while loCkIng: never had lock item!".to_owned()]
    );
}

// --- sibling isolation ---

#[tokio::test]
async fn test_store_failure_for_one_power_spares_siblings() {
    let now = seed_time();
    let inner = seeded_store(now);
    let store: Arc<dyn WorldStore> =
        Arc::new(FlakyStore::failing_player(inner.clone(), "4"));
    let poisoned = due_power(ActionKind::Locking, "4", "Timeline 1", now);
    let poisoned_id = poisoned.id;
    let healthy = due_power(ActionKind::Locking, "3", "Timeline 1", now);
    let healthy_id = healthy.id;
    inner.insert_power(poisoned).unwrap();
    inner.insert_power(healthy).unwrap();
    let scheduler = scheduler_over(store, now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    let timeline = inner.timeline("Timeline 1").await.unwrap().unwrap();
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.outcome_of(poisoned_id),
        Some(Outcome::Failed(_))
    ));
    assert_eq!(report.outcome_of(healthy_id), Some(&Outcome::Applied));
    assert!(timeline.is_locked);
    assert_eq!(inner.powers().unwrap().len(), 3);
    assert_eq!(
        message_texts(&inner),
        vec!["Has locked the timeline".to_owned()]
    );
}

// --- end-to-end action scenarios ---

#[tokio::test]
async fn test_steal_without_target_item_transfers_nothing() {
    let now = seed_time();
    let store = seeded_store(now);
    let mut power = due_power(ActionKind::Stealing, "3", "Timeline 2", now);
    power.target = Some(PowerTarget::Player {
        id: "2".to_owned(),
        item_name: Some("lock".to_owned()),
    });
    let power_id = power.id;
    store.insert_power(power).unwrap();
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    let target = store.player("2").await.unwrap();
    let actor = store.player("3").await.unwrap();
    assert_eq!(
        report.outcome_of(power_id),
        Some(&Outcome::Rejected("target never had item!"))
    );
    assert_eq!(target.items.len(), 1);
    assert_eq!(actor.items.len(), 6);
    assert_eq!(
        message_texts(&store),
        vec!["Failed while Stealing: target never had item!".to_owned()]
    );
}

#[tokio::test]
async fn test_concurrent_winning_powers_crown_exactly_one() {
    let now = seed_time();
    let store = seeded_store(now);
    // Players 3 and 9 both hold lock and unlock, each inside their own
    // timeline; only the first through the gate may win.
    let first = due_power(ActionKind::Winning, "3", "Timeline 1", now);
    let second = due_power(ActionKind::Winning, "9", "Timeline 8", now);
    store.insert_power(first).unwrap();
    store.insert_power(second).unwrap();
    let scheduler = scheduler_over(store.clone(), now);

    let report = scheduler.resolve_due_powers().await.unwrap();

    let game = store.game(fixtures::GAME_ID).await.unwrap();
    let winner = game.winner_id.expect("someone must have won");
    assert!(winner == "3" || winner == "9");
    assert_eq!(report.applied(), 1);
    assert!(report
        .outcomes
        .iter()
        .any(|(_, outcome)| *outcome == Outcome::Rejected("game already has a winner")));
    assert_eq!(
        message_texts(&store)
            .iter()
            .filter(|text| *text == "Has won the game!")
            .count(),
        1
    );
    assert_eq!(store.powers().unwrap().len(), 3);
}

// --- the run loop ---

#[tokio::test]
async fn test_run_loop_settles_powers_between_ticks() {
    let _ = tracing_subscriber::fmt::try_init();
    let now = seed_time();
    let store = seeded_store(now);
    let scheduler = Arc::new(Scheduler::new(
        store.clone() as Arc<dyn WorldStore>,
        HandlerRegistry::standard(),
        Arc::new(FixedClock(now + Window::seconds(2))),
        SchedulerConfig::new(fixtures::GAME_ID)
            .with_tick_interval(Duration::from_millis(10))
            .unwrap(),
    ));

    let running = tokio::spawn({
        let scheduler = Arc::clone(&scheduler);
        async move { scheduler.run().await }
    });
    tokio::time::sleep(Duration::from_millis(60)).await;
    running.abort();

    assert!(store.powers().unwrap().is_empty());
    assert_eq!(message_texts(&store).len(), 3);
}
