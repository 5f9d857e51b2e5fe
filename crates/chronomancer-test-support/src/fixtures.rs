//! A canned game world for resolution tests.
//!
//! One game, nine timelines, ten players covering the interesting inventory
//! shapes (empty, single item, full bags), and three powers already brewing
//! in Timeline 6 that come due one second after the fixture instant.

use chrono::{DateTime, Duration, Utc};
use chronomancer_core::game::Game;
use chronomancer_core::player::{Item, Player};
use chronomancer_core::power::{ActionKind, Power, PowerTarget, SupportEntry};
use chronomancer_core::timeline::Timeline;
use uuid::Uuid;

/// The id of the fixture game.
pub const GAME_ID: &str = "1";

/// Everything needed to seed a store for a resolution test.
#[derive(Debug, Clone)]
pub struct FixtureWorld {
    pub game: Game,
    pub timelines: Vec<Timeline>,
    pub players: Vec<Player>,
    pub powers: Vec<Power>,
}

fn item(name: &str, source: &str) -> Item {
    Item::from_timeline(name, source)
}

fn player(id: &str, name: &str, items: Vec<Item>, actions: u32) -> Player {
    Player {
        id: id.to_owned(),
        game_id: GAME_ID.to_owned(),
        name: name.to_owned(),
        picture: String::new(),
        items,
        actions,
    }
}

fn timeline(name: &str, grants: &str, players: &[&str], is_locked: bool) -> Timeline {
    Timeline {
        name: name.to_owned(),
        grants: grants.to_owned(),
        players: players.iter().map(|&id| id.to_owned()).collect(),
        is_locked,
        game_id: GAME_ID.to_owned(),
    }
}

fn brewing_power(
    kind: ActionKind,
    player_id: &str,
    allies: Vec<SupportEntry>,
    enemies: Vec<SupportEntry>,
    now: DateTime<Utc>,
) -> Power {
    Power {
        id: Uuid::new_v4(),
        game_id: GAME_ID.to_owned(),
        player_id: player_id.to_owned(),
        name: kind.name().to_owned(),
        timeline_name: "Timeline 6".to_owned(),
        target: Some(PowerTarget::Timeline {
            name: "Timeline 6".to_owned(),
            item_name: None,
        }),
        start_time: now,
        end_time: now + Duration::seconds(1),
        allies,
        enemies,
    }
}

/// Builds the fixture world relative to the given instant.
#[must_use]
pub fn world(now: DateTime<Utc>) -> FixtureWorld {
    let bid = |id: &str, score: u32| SupportEntry {
        id: id.to_owned(),
        score,
    };
    FixtureWorld {
        game: Game::new(GAME_ID),
        timelines: vec![
            timeline("Timeline 1", "steal", &["1", "2", "3", "4"], false),
            timeline("Timeline 2", "assist", &["2", "3"], false),
            timeline("Timeline 3", "prevent", &["2", "3", "4"], false),
            timeline("Timeline 4", "reset", &[], false),
            timeline("Timeline 5", "assist", &["1", "2", "3", "5"], true),
            timeline("Timeline 6", "prevent", &["1", "2", "3", "5"], false),
            timeline("Timeline 7", "reset", &["1", "2", "3", "5"], false),
            timeline("Timeline 8", "steal", &["6", "7", "8", "9"], false),
            timeline("Timeline 9", "assist", &["9", "10"], false),
        ],
        players: vec![
            player("1", "No-Items Susan", vec![], 10),
            player("2", "One-Item Siobahn", vec![item("assist", "Timeline 2")], 10),
            player(
                "3",
                "Gondollieri",
                vec![
                    item("assist", "Timeline 2"),
                    item("prevent", "Timeline 3"),
                    item("reset", "Timeline 3"),
                    item("steal", "Timeline 1"),
                    item("lock", "Timeline 3"),
                    item("unlock", "Timeline 1"),
                ],
                10,
            ),
            player(
                "4",
                "Simmons",
                vec![
                    item("assist", "Timeline 2"),
                    Item::untraceable("prevent"),
                    item("reset", "Timeline 3"),
                    item("steal", "Timeline 1"),
                    item("lock", "Timeline 2"),
                    item("unlock", "Timeline 2"),
                ],
                10,
            ),
            player(
                "5",
                "No-Actions Bob",
                vec![
                    item("assist", "Timeline 2"),
                    item("lock", "Timeline 2"),
                    item("unlock", "Timeline 2"),
                    item("reset", "Timeline 2"),
                    item("steal", "Timeline 2"),
                ],
                0,
            ),
            player(
                "6",
                "Two-Items Ted",
                vec![item("assist", "Timeline 2"), item("prevent", "Timeline 2")],
                10,
            ),
            player(
                "7",
                "Four-Items Daria",
                vec![
                    item("assist", "Timeline 2"),
                    item("prevent", "Timeline 2"),
                    item("reset", "Timeline 2"),
                    item("steal", "Timeline 2"),
                ],
                10,
            ),
            player(
                "8",
                "Five-Items Fatma",
                vec![
                    item("assist", "Timeline 2"),
                    item("prevent", "Timeline 2"),
                    item("reset", "Timeline 2"),
                    item("steal", "Timeline 2"),
                    item("lock", "Timeline 2"),
                ],
                10,
            ),
            player(
                "9",
                "Six-Items Achmed",
                vec![
                    item("assist", "Timeline 2"),
                    item("prevent", "Timeline 2"),
                    item("reset", "Timeline 2"),
                    item("steal", "Timeline 2"),
                    item("lock", "Timeline 2"),
                    item("unlock", "Timeline 2"),
                ],
                10,
            ),
            player(
                "10",
                "Full-Bags Frida",
                vec![
                    item("assist", "Timeline 2"),
                    item("assist", "Timeline 2"),
                    item("prevent", "Timeline 2"),
                    item("prevent", "Timeline 2"),
                    item("reset", "Timeline 2"),
                    item("steal", "Timeline 2"),
                    item("lock", "Timeline 2"),
                    item("unlock", "Timeline 2"),
                ],
                10,
            ),
        ],
        powers: vec![
            brewing_power(ActionKind::Locking, "1", vec![], vec![], now),
            brewing_power(
                ActionKind::Resetting,
                "2",
                vec![bid("3", 1)],
                vec![bid("3", 1)],
                now,
            ),
            brewing_power(ActionKind::Resetting, "3", vec![], vec![], now),
        ],
    }
}
