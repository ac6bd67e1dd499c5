//! Confirm state and the automatic turn confirmation

mod common;

use common::{game_with, ALICE};
use postcards_ui::host::{ButtonAction, PreferenceKey};
use postcards_ui::RecordingHost;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

fn host(auto: bool) -> RecordingHost {
    let host = RecordingHost::new(ALICE).with_active(true);
    if auto {
        host.with_preference(PreferenceKey::AutoConfirm, 1)
    } else {
        host
    }
}

#[tokio::test(start_paused = true)]
async fn test_auto_confirm_fires_after_pause() {
    let mut game = game_with(host(true));
    let start = Instant::now();
    game.on_entering_state("confirm", json!({})).unwrap();
    assert!(game.host().has_button(ButtonAction::LetMeThink));

    assert!(game.wait_for_auto_confirm().await.unwrap());
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
    assert_eq!(game.host().action_names(), vec!["confirm"]);
    assert!(!game.host().has_button(ButtonAction::LetMeThink));
}

#[tokio::test(start_paused = true)]
async fn test_let_me_think_cancels() {
    let mut game = game_with(host(true));
    game.on_entering_state("confirm", json!({})).unwrap();
    assert!(game.click_button(ButtonAction::LetMeThink).unwrap());
    assert_eq!(game.auto_confirm_deadline(), None);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!game.fire_due_timers(Instant::now()).unwrap());
    assert!(game.host().actions.is_empty());
    assert!(game.host().has_button(ButtonAction::Confirm));
}

#[tokio::test(start_paused = true)]
async fn test_leaving_confirm_drops_the_timer() {
    let mut game = game_with(host(true));
    game.on_entering_state("confirm", json!({})).unwrap();
    game.on_leaving_state("confirm").unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!game.fire_due_timers(Instant::now()).unwrap());
    assert!(game.host().actions.is_empty());
}

#[test]
fn test_no_preference_no_timer() {
    let mut game = game_with(host(false));
    game.on_entering_state("confirm", json!({})).unwrap();
    assert_eq!(game.auto_confirm_deadline(), None);
    assert_eq!(
        game.host().button_actions(),
        vec![ButtonAction::Confirm, ButtonAction::Undo, ButtonAction::Reset]
    );
}

#[tokio::test(start_paused = true)]
async fn test_manual_confirm_before_deadline() {
    let mut game = game_with(host(true));
    game.on_entering_state("confirm", json!({})).unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(game.click_button(ButtonAction::Confirm).unwrap());

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert!(!game.fire_due_timers(Instant::now()).unwrap());
    assert_eq!(game.host().action_names(), vec!["confirm"]);
}
