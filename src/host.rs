//! Interface to the hosting runtime
//!
//! The host delivers state transitions and notifications, renders the status
//! bar and the animations, stores preferences and sends actions to the
//! server. This module defines what the UI core needs from it, plus an
//! in-memory implementation used by the replay tool and the tests.

use crate::animation::Animation;
use crate::core::{BonusKind, PlayerId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

/// Opaque handle of a status bar button
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ButtonHandle(u32);

impl ButtonHandle {
    pub fn new(id: u32) -> Self {
        ButtonHandle(id)
    }
}

/// What a status bar button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    Pass,
    Undo,
    Reset,
    Skip,
    Confirm,
    /// Abort a pending auto-confirm
    LetMeThink,
    Camp,
    Bonus(BonusKind),
    DoubleAction,
    ConfirmDouble,
    CancelDouble,
    ConfirmGuide,
    DiscardPostcards,
}

impl ButtonAction {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonAction::Pass => "Pass",
            ButtonAction::Undo => "Undo",
            ButtonAction::Reset => "Restart turn",
            ButtonAction::Skip => "Skip",
            ButtonAction::Confirm => "Confirm",
            ButtonAction::LetMeThink => "Let me think",
            ButtonAction::Camp => "Camp",
            ButtonAction::Bonus(kind) => kind.label(),
            ButtonAction::DoubleAction => "Double action",
            ButtonAction::ConfirmDouble => "Confirm double action",
            ButtonAction::CancelDouble => "Cancel",
            ButtonAction::ConfirmGuide => "Confirm",
            ButtonAction::DiscardPostcards => "Discard postcards",
        }
    }

    pub fn style(&self) -> ButtonStyle {
        match self {
            ButtonAction::Undo | ButtonAction::Reset | ButtonAction::CancelDouble => {
                ButtonStyle::Alert
            }
            ButtonAction::Pass | ButtonAction::Skip | ButtonAction::LetMeThink => {
                ButtonStyle::Secondary
            }
            _ => ButtonStyle::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Alert,
}

/// Who a status bar title is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleContext {
    /// The title speaks to the viewer ("${you}") rather than about the
    /// active player ("${actplayer}")
    pub you: bool,
}

/// Preference keys read from the host's user preference store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    /// 1 = confirm the turn automatically after a pause
    AutoConfirm,
    /// Index into the zoom steps
    Zoom,
}

pub trait Host {
    /// Fire-and-forget action dispatch to the server
    fn perform_action(&mut self, name: &str, payload: Value);

    fn is_current_player_active(&self) -> bool;

    fn current_player_id(&self) -> PlayerId;

    fn add_action_button(&mut self, label: &str, action: ButtonAction, style: ButtonStyle)
        -> ButtonHandle;

    fn remove_action_button(&mut self, handle: ButtonHandle);

    fn set_title(&mut self, text: &str, context: &TitleContext);

    fn preference(&self, key: PreferenceKey) -> Option<i64>;

    /// Start an animation and report how long to wait for it
    fn play_animation(&mut self, animation: &Animation) -> Duration {
        animation.duration()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedAction {
    pub name: String,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedButton {
    pub handle: ButtonHandle,
    pub label: String,
    pub action: ButtonAction,
    pub style: ButtonStyle,
}

/// Host that records everything it is asked to do
///
/// Delays queued in `delays` replace the canonical duration of the next
/// animations, one per animation, which lets tests stretch or squash
/// individual handlers.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub player_id: PlayerId,
    pub active: bool,
    pub actions: Vec<DispatchedAction>,
    pub buttons: Vec<RecordedButton>,
    pub titles: Vec<String>,
    pub animations: Vec<Animation>,
    pub preferences: FxHashMap<PreferenceKey, i64>,
    pub delays: VecDeque<Duration>,
    next_handle: u32,
}

impl RecordingHost {
    pub fn new(player_id: PlayerId) -> Self {
        RecordingHost {
            player_id,
            ..Default::default()
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_preference(mut self, key: PreferenceKey, value: i64) -> Self {
        self.preferences.insert(key, value);
        self
    }

    pub fn last_title(&self) -> Option<&str> {
        self.titles.last().map(String::as_str)
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn has_button(&self, action: ButtonAction) -> bool {
        self.buttons.iter().any(|b| b.action == action)
    }

    pub fn button_actions(&self) -> Vec<ButtonAction> {
        self.buttons.iter().map(|b| b.action).collect()
    }
}

impl Host for RecordingHost {
    fn perform_action(&mut self, name: &str, payload: Value) {
        self.actions.push(DispatchedAction {
            name: name.to_string(),
            payload,
        });
    }

    fn is_current_player_active(&self) -> bool {
        self.active
    }

    fn current_player_id(&self) -> PlayerId {
        self.player_id
    }

    fn add_action_button(
        &mut self,
        label: &str,
        action: ButtonAction,
        style: ButtonStyle,
    ) -> ButtonHandle {
        let handle = ButtonHandle::new(self.next_handle);
        self.next_handle += 1;
        self.buttons.push(RecordedButton {
            handle,
            label: label.to_string(),
            action,
            style,
        });
        handle
    }

    fn remove_action_button(&mut self, handle: ButtonHandle) {
        self.buttons.retain(|b| b.handle != handle);
    }

    fn set_title(&mut self, text: &str, _context: &TitleContext) {
        self.titles.push(text.to_string());
    }

    fn preference(&self, key: PreferenceKey) -> Option<i64> {
        self.preferences.get(&key).copied()
    }

    fn play_animation(&mut self, animation: &Animation) -> Duration {
        self.animations.push(animation.clone());
        self.delays.pop_front().unwrap_or_else(|| animation.duration())
    }
}
