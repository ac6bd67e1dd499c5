//! Stale clicks must never reach the server

mod common;

use common::game;
use postcards_ui::host::ButtonAction;
use postcards_ui::UiError;
use serde_json::json;

#[test]
fn test_click_from_previous_state_is_ignored() {
    let mut game = game(true);
    game.on_entering_state("move", json!({"regions": [2]})).unwrap();
    let region = game.region(2).unwrap();
    game.on_leaving_state("move").unwrap();

    game.on_entering_state("camp", json!({"campsites": [12]})).unwrap();
    assert!(!game.click(region).unwrap());
    assert!(game.host().actions.is_empty());
}

#[test]
fn test_double_click_dispatches_once() {
    let mut game = game(true);
    game.on_entering_state("camp", json!({"campsites": [12, 13]})).unwrap();
    let site = game.campsite(13).unwrap();

    assert!(game.click(site).unwrap());
    assert!(!game.click(site).unwrap());
    let other = game.campsite(12).unwrap();
    assert!(!game.click(other).unwrap());

    assert_eq!(game.host().action_names(), vec!["camp"]);
    assert_eq!(game.host().actions[0].payload, json!({"campsite": 13}));
}

#[test]
fn test_inactive_viewer_cannot_click() {
    let mut game = game(false);
    game.on_entering_state("souvenir", json!({"spaces": [14]})).unwrap();
    let space = game.souvenir_space(14).unwrap();
    assert!(!game.click(space).unwrap());
    assert!(!game.click_button(ButtonAction::Skip).unwrap());
    assert!(game.host().actions.is_empty());
}

#[test]
fn test_stale_button_is_ignored() {
    let mut game = game(true);
    assert!(!game.click_button(ButtonAction::Pass).unwrap());

    game.on_entering_state("gift", json!({"gifts": [1], "can_skip": true})).unwrap();
    game.on_leaving_state("gift").unwrap();
    assert!(!game.click_button(ButtonAction::Skip).unwrap());

    // A button that exists, but not in this state
    game.on_entering_state("travel", json!({"deck": true})).unwrap();
    assert!(!game.click_button(ButtonAction::Skip).unwrap());
    assert!(game.host().actions.is_empty());
}

#[test]
fn test_click_without_state_is_ignored() {
    let mut game = game(true);
    let region = game.region(1).unwrap();
    assert!(!game.click(region).unwrap());
}

#[test]
fn test_click_by_path() {
    let mut game = game(true);
    game.on_entering_state("postcard", json!({"postcards": [10]})).unwrap();
    let card = game.tree().resolve_path("supply:postcard/postcard:10").unwrap();
    let path = game.tree().path_of(card).unwrap();
    game.on_leaving_state("postcard").unwrap();

    game.on_entering_state("postcard", json!({})).unwrap();
    let err = game.click_path("supply:postcard/postcard:99").unwrap_err();
    assert!(matches!(err, UiError::ChildNotFound { .. }));
    assert!(game.click_path(&path).unwrap());
    assert_eq!(game.host().actions[0].payload, json!({"postcard": 10}));
}

#[test]
fn test_deck_click_sends_deck_flag() {
    let mut game = game(true);
    game.on_entering_state("gift", json!({"deck": true, "gifts": []})).unwrap();
    let top = game.layout().gift.take_top(game.tree()).unwrap();
    assert!(game.click(top).unwrap());
    assert_eq!(game.host().actions[0].name, "gift");
    assert_eq!(game.host().actions[0].payload, json!({"deck": true}));
}
