//! Action state titles as the status bar shows them

mod common;

use common::game;
use postcards_ui::host::ButtonAction;
use serde_json::{json, Value};

fn title_for(active: bool, args: Value) -> String {
    let mut game = game(active);
    game.on_entering_state("action", args).unwrap();
    game.host().last_title().unwrap().to_string()
}

#[test]
fn test_first_travel_of_the_turn() {
    assert_eq!(
        title_for(true, json!({"used_travels": [], "possible": {}})),
        "${you} must play a Travel card (0/3)"
    );
}

#[test]
fn test_all_clauses_joined() {
    let args = json!({
        "used_travels": [3, 12],
        "possible": {
            "bonus": {"souvenir": true},
            "send": [7],
            "gifts": [4]
        }
    });
    assert_eq!(
        title_for(true, args.clone()),
        "${you} must play a Travel card, use a Bonus action, send a Postcard or play a Gift card (2/3)"
    );
    assert_eq!(
        title_for(false, args),
        "${actplayer} must play a Travel card, use a Bonus action, send a Postcard or play a Gift card (2/3)"
    );
}

#[test]
fn test_budget_spent_turns_must_into_can() {
    let mut game = game(true);
    game.on_entering_state(
        "action",
        json!({"used_travels": [3, 12, 20], "possible": {"send": [8]}}),
    )
    .unwrap();
    assert_eq!(
        game.host().last_title(),
        Some("${you} can send a Postcard (3/3)")
    );
    // Optional play: passing is allowed and the hand is not clickable
    assert!(game.host().has_button(ButtonAction::Pass));
    assert!(game.host().has_button(ButtonAction::Undo));
    let hand_card = game.tree().resolve_path("player:1/hand:hand/travel:3").unwrap();
    assert!(!game.tree().is_active(hand_card));
    let postcard = game.tree().resolve_path("player:1/postcard:8").unwrap();
    assert!(game.tree().is_active(postcard));
}

#[test]
fn test_stamp_bonus_without_colours_is_not_offered() {
    let mut game = game(true);
    game.on_entering_state(
        "action",
        json!({
            "used_travels": [3, 12, 20],
            "possible": {"bonus": {"stamp": true}, "stamps": {"red": false, "blue": false}}
        }),
    )
    .unwrap();
    assert_eq!(
        game.host().last_title(),
        Some("${you} must play a Travel card (3/3)")
    );
    assert!(!game
        .host()
        .button_actions()
        .iter()
        .any(|a| matches!(a, ButtonAction::Bonus(_))));
}

#[test]
fn test_raised_travel_limit() {
    assert_eq!(
        title_for(true, json!({"used_travels": [3, 12, 20], "max_travels": 4, "possible": {}})),
        "${you} can play a Travel card (3/4)"
    );
}
