//! Enter/leave symmetry for every state
//!
//! Whatever a state makes clickable on entry must be clickable no more once
//! it is left, and no status bar button may outlive it.

mod common;

use common::{game_from, two_players, ALICE};
use postcards_ui::game::StateName;
use postcards_ui::RecordingHost;
use serde_json::{json, Value};

/// State args valid for the two-player fixture, and the number of nodes
/// each activates for the active player
fn cases() -> Vec<(StateName, Value, usize)> {
    vec![
        (
            StateName::Action,
            json!({
                "used_travels": [3],
                "possible": {
                    "send": [7],
                    "camp": true,
                    "gifts": [4],
                    "bonus": {"move": true},
                    "double": true
                }
            }),
            5,
        ),
        (StateName::Camp, json!({"campsites": [12, 13], "can_skip": true}), 2),
        (StateName::Confirm, json!({}), 0),
        (StateName::Gift, json!({"gifts": [1], "deck": true, "can_skip": true}), 2),
        (StateName::Guide, json!({}), 2),
        (StateName::Move, json!({"regions": [2, 3]}), 2),
        (StateName::Postcard, json!({"deck": true, "can_discard": true}), 5),
        (StateName::Souvenir, json!({"spaces": [14, 15]}), 2),
        (
            StateName::Stamp,
            json!({"stamps": {"blue": true, "green": false, "red": true}}),
            2,
        ),
        (StateName::Star, json!({"region": 5}), 0),
        (StateName::Travel, json!({"travels": [5, 9], "deck": true}), 3),
    ]
}

fn table(active: bool) -> postcards_ui::Game<RecordingHost> {
    let mut setup = two_players();
    setup.guide = vec![50, 51];
    game_from(&setup, RecordingHost::new(ALICE).with_active(active))
}

#[test]
fn test_every_state_is_covered() {
    let covered: Vec<StateName> = cases().into_iter().map(|(state, _, _)| state).collect();
    assert_eq!(covered, StateName::ALL.to_vec());
}

#[test]
fn test_leave_restores_active_set() {
    for (state, args, expected) in cases() {
        let mut game = table(true);
        let before = game.tree().active_nodes();
        assert!(before.is_empty());

        game.on_entering_state(state.as_str(), args).unwrap();
        assert_eq!(
            game.tree().active_nodes().len(),
            expected,
            "{state} activated the wrong number of nodes"
        );
        assert!(
            game.host().last_title().unwrap().starts_with("${you}"),
            "{state} title"
        );

        game.on_leaving_state(state.as_str()).unwrap();
        assert_eq!(game.tree().active_nodes(), before, "{state} left nodes active");
        assert!(game.host().buttons.is_empty(), "{state} left buttons behind");
        assert_eq!(game.selection(), None, "{state} left a selector behind");
        game.tree().verify_consistency().unwrap();
    }
}

#[test]
fn test_ledger_accounts_for_every_activation() {
    // Leaving releases only what the ledger holds
    for (state, args, _) in cases() {
        let mut game = table(true);
        game.on_entering_state(state.as_str(), args).unwrap();

        let mut recorded = game.activated().to_vec();
        recorded.sort();
        assert_eq!(recorded, game.tree().active_nodes(), "{state} activation");

        let mut tracked: Vec<_> = game.buttons().iter().map(|b| b.handle).collect();
        let mut shown: Vec<_> = game.host().buttons.iter().map(|b| b.handle).collect();
        tracked.sort();
        shown.sort();
        assert_eq!(tracked, shown, "{state} buttons");
        assert!(game.buttons().iter().all(|b| b.phase == state), "{state} button phase");

        game.on_leaving_state(state.as_str()).unwrap();
        assert!(game.activated().is_empty(), "{state} ledger");
        assert!(game.buttons().is_empty(), "{state} tracked buttons");
    }
}

#[test]
fn test_inactive_viewer_gets_title_only() {
    for (state, args, _) in cases() {
        let mut game = table(false);
        game.on_entering_state(state.as_str(), args).unwrap();

        assert!(game.tree().active_nodes().is_empty(), "{state} activated nodes");
        assert!(game.host().buttons.is_empty(), "{state} added buttons");
        let title = game.host().last_title().unwrap();
        assert!(title.starts_with("${actplayer}"), "{state} title: {title}");

        game.on_leaving_state(state.as_str()).unwrap();
    }
}

#[test]
fn test_action_buttons() {
    let mut game = table(true);
    let (_, args, _) = cases().remove(0);
    game.on_entering_state("action", args).unwrap();

    use postcards_ui::core::BonusKind;
    use postcards_ui::host::ButtonAction;
    assert_eq!(
        game.host().button_actions(),
        vec![
            ButtonAction::Bonus(BonusKind::Move),
            ButtonAction::Camp,
            ButtonAction::DoubleAction,
            ButtonAction::Undo,
        ]
    );
}

#[test]
fn test_abrupt_state_change_leaves_nothing_behind() {
    let mut game = table(true);
    for (state, args, _) in cases() {
        // No leave in between: entering the next state must clean up
        game.on_entering_state(state.as_str(), args).unwrap();
    }
    let active = game.tree().active_nodes();
    assert_eq!(active.len(), 3, "only the travel state's nodes");
    for node in active {
        let element = game.tree().get(node).unwrap();
        assert_eq!(element.phase_tag(), Some("travel"));
    }
}
