//! Shared helpers for the integration tests

#![allow(dead_code)]

use postcards_ui::config::UiConfig;
use postcards_ui::core::PlayerId;
use postcards_ui::game::{Game, GameSetup};
use postcards_ui::notifications::Notification;
use postcards_ui::RecordingHost;
use serde_json::Value;
use std::path::PathBuf;

pub const ALICE: PlayerId = PlayerId::new(1);
pub const BOB: PlayerId = PlayerId::new(2);

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn two_players() -> GameSetup {
    let text = std::fs::read_to_string(fixture_path("two_players.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Alice's client; `active` says whether Alice is the active player
pub fn game(active: bool) -> Game<RecordingHost> {
    game_with(RecordingHost::new(ALICE).with_active(active))
}

pub fn game_with(host: RecordingHost) -> Game<RecordingHost> {
    game_from(&two_players(), host)
}

pub fn game_from(setup: &GameSetup, host: RecordingHost) -> Game<RecordingHost> {
    Game::setup(host, UiConfig::default(), setup).unwrap()
}

pub fn notification(uid: &str, name: &str, log: &str, args: Value) -> Notification {
    Notification::from_json(serde_json::json!({
        "uid": uid,
        "type": name,
        "log": log,
        "args": args,
    }))
    .unwrap()
}
