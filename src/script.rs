//! Replay scripts
//!
//! A script is a recorded sequence of host events: state transitions,
//! notifications, clicks, button presses and clock ticks. Replaying one
//! against a [`RecordingHost`] drives the UI core exactly as a live table
//! would and leaves the dispatched actions and the final tree behind for
//! inspection.

use crate::core::PlayerId;
use crate::game::{Game, GameSetup};
use crate::host::{ButtonAction, RecordingHost};
use crate::notifications::{Notification, NotificationEvent, NotificationPlayer};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

fn default_active() -> bool {
    true
}

/// One host event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Enter {
        state: String,
        #[serde(default)]
        args: Value,
        /// Whether the viewer is the active player in this state
        #[serde(default = "default_active")]
        active: bool,
    },
    Leave {
        state: String,
    },
    Notify {
        #[serde(default)]
        uid: String,
        #[serde(rename = "type")]
        name: String,
        #[serde(default)]
        log: String,
        #[serde(default)]
        args: Value,
    },
    /// Click the node at a `kind:child/...` path
    Click {
        path: String,
    },
    Button {
        action: ButtonAction,
    },
    /// Let the clock run, then fire any due timer
    Tick {
        ms: u64,
    },
    ZoomIn,
    ZoomOut,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Table snapshot; the CLI can supply one separately
    #[serde(default)]
    pub setup: Option<GameSetup>,
    /// Player the client belongs to; the first player when absent
    #[serde(default)]
    pub viewer: Option<PlayerId>,
    pub steps: Vec<ScriptStep>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// What happened during a replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub notifications: usize,
    /// Clicks and button presses that dispatched an action
    pub handled_inputs: usize,
    /// Clicks and button presses ignored as stale
    pub stale_inputs: usize,
    pub timers_fired: usize,
}

fn count_input(report: &mut ReplayReport, handled: bool) {
    if handled {
        report.handled_inputs += 1;
    } else {
        report.stale_inputs += 1;
    }
}

/// Replay every step in order
pub async fn run(game: &mut Game<RecordingHost>, steps: &[ScriptStep]) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();
    for step in steps {
        report.steps += 1;
        match step {
            ScriptStep::Enter {
                state,
                args,
                active,
            } => {
                game.host_mut().active = *active;
                game.on_entering_state(state, args.clone())?;
            }
            ScriptStep::Leave { state } => game.on_leaving_state(state)?,
            ScriptStep::Notify {
                uid,
                name,
                log,
                args,
            } => {
                let event = NotificationEvent::parse(name, args.clone())?;
                let notification = Notification::new(uid.as_str(), log.as_str(), event);
                NotificationPlayer::play(game, &notification).await?;
                report.notifications += 1;
            }
            ScriptStep::Click { path } => {
                let handled = game.click_path(path)?;
                count_input(&mut report, handled);
            }
            ScriptStep::Button { action } => {
                let handled = game.click_button(*action)?;
                count_input(&mut report, handled);
            }
            ScriptStep::Tick { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                if game.fire_due_timers(tokio::time::Instant::now())? {
                    report.timers_fired += 1;
                }
            }
            ScriptStep::ZoomIn => {
                game.zoom_in()?;
            }
            ScriptStep::ZoomOut => {
                game.zoom_out()?;
            }
        }
    }
    game.logger().event(
        "replay",
        &format!(
            "{} steps, {} notifications, {} stale inputs",
            report.steps, report.notifications, report.stale_inputs
        ),
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::host::PreferenceKey;
    use crate::notifications::test_support::table;
    use serde_json::json;

    fn steps(value: Value) -> Vec<ScriptStep> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_step_format() {
        let parsed = steps(json!([
            {"step": "enter", "state": "camp", "args": {"campsites": [11]}},
            {"step": "button", "action": {"bonus": "move"}},
            {"step": "zoom_in"}
        ]));
        assert!(matches!(&parsed[0], ScriptStep::Enter { active: true, .. }));
        assert_eq!(
            parsed[1],
            ScriptStep::Button {
                action: ButtonAction::Bonus(crate::core::BonusKind::Move)
            }
        );
        assert_eq!(parsed[2], ScriptStep::ZoomIn);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_counts_inputs() {
        let host = RecordingHost::new(PlayerId::new(1));
        let mut game = Game::setup(host, UiConfig::default(), &table()).unwrap();
        let report = run(
            &mut game,
            &steps(json!([
                {"step": "enter", "state": "camp", "args": {"campsites": [11, 12]}},
                {"step": "click", "path": "board:board/region:1/campsite:13"},
                {"step": "click", "path": "board:board/region:1/campsite:12"},
                {"step": "leave", "state": "camp"},
                {"step": "notify", "uid": "n1", "type": "camp", "log": "Alice camps",
                 "args": {"player_id": 1, "campsite": 12}}
            ])),
        )
        .await
        .unwrap();

        assert_eq!(report.handled_inputs, 1);
        assert_eq!(report.stale_inputs, 1);
        assert_eq!(report.notifications, 1);
        assert_eq!(game.host().action_names(), vec!["camp"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_fires_auto_confirm() {
        let host = RecordingHost::new(PlayerId::new(1)).with_preference(PreferenceKey::AutoConfirm, 1);
        let mut game = Game::setup(host, UiConfig::default(), &table()).unwrap();
        let report = run(
            &mut game,
            &steps(json!([
                {"step": "enter", "state": "confirm"},
                {"step": "tick", "ms": 1000},
                {"step": "tick", "ms": 2500}
            ])),
        )
        .await
        .unwrap();
        assert_eq!(report.timers_fired, 1);
        assert_eq!(game.host().action_names(), vec!["confirm"]);
    }
}
