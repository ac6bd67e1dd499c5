//! The game aggregate
//!
//! Owns the element tree, the host, the log panels and everything scoped to
//! the live server state: the activation ledger, the status bar buttons,
//! the card selector and the pending auto-confirm. State handlers and
//! notification handlers both work through it.

use crate::animation::Animation;
use crate::config::UiConfig;
use crate::core::{Attr, NodeId, NodeKind, PlayerId};
use crate::game::setup::{self, GameSetup, Layout, HAND, USED};
use crate::game::{StateName, Zoom};
use crate::handlers::{self, action::ActionArgs};
use crate::host::{ButtonAction, ButtonHandle, Host, PreferenceKey, TitleContext};
use crate::log_panel::LogPanel;
use crate::logger::UiLogger;
use crate::tree::{ElementTree, Selection};
use crate::{Result, UiError};
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// A status bar button added for one state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusButton {
    pub handle: ButtonHandle,
    pub action: ButtonAction,
    /// State that added the button; a click in any other state is stale
    pub phase: StateName,
}

/// What the two-slot selector is picking cards for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    /// Postcards from the guide row
    Guide,
    /// Two travel cards from hand for a double action
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    pub mode: SelectorMode,
    pub selection: Selection,
}

impl Selector {
    pub fn new(mode: SelectorMode) -> Self {
        Selector {
            mode,
            selection: Selection::Empty,
        }
    }

    /// Picks needed before the confirm button shows
    pub fn min(&self) -> usize {
        match self.mode {
            SelectorMode::Guide => 1,
            SelectorMode::Double => 2,
        }
    }

    pub fn confirm_action(&self) -> ButtonAction {
        match self.mode {
            SelectorMode::Guide => ButtonAction::ConfirmGuide,
            SelectorMode::Double => ButtonAction::ConfirmDouble,
        }
    }
}

pub struct Game<H: Host> {
    tree: ElementTree,
    host: H,
    config: UiConfig,
    logger: UiLogger,
    log_panel: LogPanel,
    layout: Layout,
    players: Vec<PlayerId>,
    zoom: Zoom,

    /// Live server state, if any
    pub(crate) phase: Option<StateName>,
    /// Nodes activated since the live state was entered
    pub(crate) ledger: Vec<NodeId>,
    pub(crate) buttons: Vec<StatusButton>,
    pub(crate) selector: Option<Selector>,
    /// Possible-actions snapshot of the live Action state
    pub(crate) action_args: Option<ActionArgs>,
    pub(crate) auto_confirm: Option<Instant>,
}

impl<H: Host> Game<H> {
    /// Build the full table from the initial snapshot
    pub fn setup(host: H, config: UiConfig, snapshot: &GameSetup) -> Result<Self> {
        config.validate()?;
        let mut tree = ElementTree::new();
        let layout = setup::build(&mut tree, snapshot)?;

        let zoom_index = host
            .preference(PreferenceKey::Zoom)
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(config.default_zoom_index);
        let zoom = Zoom::new(config.zoom_steps.clone(), zoom_index);
        let root = tree.root();
        tree.set_arg(root, Attr::Zoom, zoom.percent())?;

        let logger = UiLogger::with_verbosity(config.verbosity);
        logger.event(
            "setup",
            &format!(
                "table ready: {} players, {} nodes, viewer {}",
                snapshot.players.len(),
                tree.len(),
                host.current_player_id()
            ),
        );

        Ok(Game {
            tree,
            host,
            config,
            logger,
            log_panel: LogPanel::new(),
            layout,
            players: snapshot.players.iter().map(|p| p.id).collect(),
            zoom,
            phase: None,
            ledger: Vec::new(),
            buttons: Vec::new(),
            selector: None,
            action_args: None,
            auto_confirm: None,
        })
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn logger(&self) -> &UiLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut UiLogger {
        &mut self.logger
    }

    pub fn log_panel(&self) -> &LogPanel {
        &self.log_panel
    }

    pub(crate) fn log_panel_mut(&mut self) -> &mut LogPanel {
        &mut self.log_panel
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn phase(&self) -> Option<StateName> {
        self.phase
    }

    pub fn buttons(&self) -> &[StatusButton] {
        &self.buttons
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selector.map(|s| s.selection)
    }

    /// Nodes activated since the live state was entered
    pub fn activated(&self) -> &[NodeId] {
        &self.ledger
    }

    pub fn auto_confirm_deadline(&self) -> Option<Instant> {
        self.auto_confirm
    }

    /// Player this client belongs to
    pub fn viewer(&self) -> PlayerId {
        self.host.current_player_id()
    }

    // ---------------------------------------------------------------------
    // State transitions
    // ---------------------------------------------------------------------

    pub fn on_entering_state(&mut self, name: &str, args: Value) -> Result<()> {
        let Some(state) = StateName::parse(name) else {
            self.logger
                .event("state", &format!("ignoring unknown state '{name}'"));
            return Ok(());
        };
        if let Some(live) = self.phase {
            self.logger
                .event("state", &format!("{live} still live when entering {state}"));
            self.leave_state(live)?;
        }

        let active = self.host.is_current_player_active();
        self.phase = Some(state);
        self.logger
            .event("state", &format!("entering {state} (active: {active})"));
        handlers::enter(self, state, args, active)
    }

    pub fn on_leaving_state(&mut self, name: &str) -> Result<()> {
        let Some(state) = StateName::parse(name) else {
            self.logger
                .event("state", &format!("ignoring unknown state '{name}'"));
            return Ok(());
        };
        if self.phase != Some(state) {
            self.logger.detail(
                "state",
                &format!("leaving {state} while live state is {:?}", self.phase),
            );
        }
        self.leave_state(state)
    }

    /// Tear down everything the live state set up
    fn leave_state(&mut self, state: StateName) -> Result<()> {
        self.release_activation()?;
        self.clear_buttons();
        self.selector = None;
        self.action_args = None;
        self.auto_confirm = None;
        self.phase = None;
        self.logger.event("state", &format!("left {state}"));
        Ok(())
    }

    // ---------------------------------------------------------------------
    // User input
    // ---------------------------------------------------------------------

    /// Handle a click on a node
    ///
    /// Returns `Ok(false)` when the click is stale: the node is gone, no
    /// longer active, was activated by another state, or the viewer is not
    /// the active player.
    pub fn click(&mut self, node: NodeId) -> Result<bool> {
        let Some(phase) = self.phase else {
            log_if_verbose!(self, "click", "ignored click on {node}: no live state");
            return Ok(false);
        };
        let Ok(element) = self.tree.get(node) else {
            log_if_verbose!(self, "click", "ignored click on removed node {node}");
            return Ok(false);
        };
        if !element.is_active() || element.phase_tag() != Some(phase.as_str()) {
            log_if_verbose!(
                self,
                "click",
                "ignored stale click on {node} (phase tag {:?}, live {phase})",
                element.phase_tag()
            );
            return Ok(false);
        }
        if !self.host.is_current_player_active() {
            log_if_verbose!(self, "click", "ignored click on {node}: viewer not active");
            return Ok(false);
        }
        handlers::click(self, phase, node)
    }

    /// Click a node addressed by a `kind:child/...` path
    pub fn click_path(&mut self, path: &str) -> Result<bool> {
        let node = self.tree.resolve_path(path)?;
        self.click(node)
    }

    /// Handle a status bar button click, ignoring stale buttons
    pub fn click_button(&mut self, action: ButtonAction) -> Result<bool> {
        let Some(phase) = self.phase else {
            log_if_verbose!(self, "click", "ignored {action:?}: no live state");
            return Ok(false);
        };
        let live = self
            .buttons
            .iter()
            .any(|b| b.action == action && b.phase == phase);
        if !live || !self.host.is_current_player_active() {
            log_if_verbose!(self, "click", "ignored stale button {action:?} in {phase}");
            return Ok(false);
        }
        handlers::button(self, phase, action)
    }

    // ---------------------------------------------------------------------
    // Activation ledger
    // ---------------------------------------------------------------------

    /// Make a node clickable for the live state and record it
    pub(crate) fn activate(&mut self, node: NodeId) -> Result<()> {
        let phase = self
            .phase
            .ok_or_else(|| UiError::InvalidArgs(format!("activating {node} outside a state")))?;
        self.tree.activate(node, phase.as_str())?;
        if !self.ledger.contains(&node) {
            self.ledger.push(node);
        }
        log_if_verbose!(self, "activate", "{node} for {phase}");
        Ok(())
    }

    pub(crate) fn deactivate(&mut self, node: NodeId) -> Result<()> {
        if self.tree.contains(node) {
            self.tree.deactivate(node)?;
            if self.tree.arg(node, Attr::Selected).is_some() {
                self.tree.clear_arg(node, Attr::Selected)?;
            }
        }
        self.ledger.retain(|n| *n != node);
        Ok(())
    }

    /// Deactivate everything activated since the live state was entered
    ///
    /// Nodes removed in the meantime are skipped.
    pub(crate) fn release_activation(&mut self) -> Result<()> {
        for node in std::mem::take(&mut self.ledger) {
            self.deactivate(node)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Status bar
    // ---------------------------------------------------------------------

    pub(crate) fn set_phase_title(&mut self, active: bool, phrase: &str) {
        let subject = if active { "${you}" } else { "${actplayer}" };
        let title = format!("{subject} {phrase}");
        log_if_verbose!(self, "title", "{title}");
        self.host.set_title(&title, &TitleContext { you: active });
    }

    pub(crate) fn add_button(&mut self, action: ButtonAction) -> Result<()> {
        let phase = self
            .phase
            .ok_or_else(|| UiError::InvalidArgs(format!("button {action:?} outside a state")))?;
        if self.has_button(action) {
            return Ok(());
        }
        let handle = self
            .host
            .add_action_button(action.label(), action, action.style());
        self.buttons.push(StatusButton {
            handle,
            action,
            phase,
        });
        Ok(())
    }

    pub(crate) fn remove_button(&mut self, action: ButtonAction) {
        let (removed, kept): (Vec<StatusButton>, Vec<StatusButton>) =
            self.buttons.iter().copied().partition(|b| b.action == action);
        for button in removed {
            self.host.remove_action_button(button.handle);
        }
        self.buttons = kept;
    }

    pub(crate) fn clear_buttons(&mut self) {
        for button in std::mem::take(&mut self.buttons) {
            self.host.remove_action_button(button.handle);
        }
    }

    pub fn has_button(&self, action: ButtonAction) -> bool {
        self.buttons.iter().any(|b| b.action == action)
    }

    /// Send an action to the server through the host
    pub(crate) fn perform(&mut self, name: &str, payload: Value) {
        self.logger.event("action", &format!("{name} {payload}"));
        self.host.perform_action(name, payload);
    }

    /// Send the player's final choice and lock input until the next state
    pub(crate) fn commit(&mut self, name: &str, payload: Value) -> Result<()> {
        self.perform(name, payload);
        self.release_activation()?;
        self.clear_buttons();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Auto-confirm
    // ---------------------------------------------------------------------

    pub(crate) fn schedule_auto_confirm(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.config.auto_confirm_pause();
        self.auto_confirm = Some(deadline);
        self.add_button(ButtonAction::LetMeThink)?;
        log_if_verbose!(
            self,
            "confirm",
            "auto-confirm in {:?}",
            self.config.auto_confirm_pause()
        );
        Ok(())
    }

    pub(crate) fn cancel_auto_confirm(&mut self) {
        if self.auto_confirm.take().is_some() {
            self.logger.event("confirm", "auto-confirm canceled");
        }
        self.remove_button(ButtonAction::LetMeThink);
    }

    /// Fire the auto-confirm if its deadline has passed
    pub fn fire_due_timers(&mut self, now: Instant) -> Result<bool> {
        match self.auto_confirm {
            Some(deadline) if now >= deadline && self.phase == Some(StateName::Confirm) => {
                self.auto_confirm = None;
                self.commit("confirm", serde_json::json!({}))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Wait for a pending auto-confirm and fire it
    ///
    /// Returns false right away when nothing is pending.
    pub async fn wait_for_auto_confirm(&mut self) -> Result<bool> {
        let Some(deadline) = self.auto_confirm else {
            return Ok(false);
        };
        tokio::time::sleep_until(deadline).await;
        self.fire_due_timers(Instant::now())
    }

    // ---------------------------------------------------------------------
    // Animation pacing
    // ---------------------------------------------------------------------

    /// Start an animation and wait until it has played out
    pub(crate) async fn animate(&mut self, animation: Animation) {
        let duration = self.host.play_animation(&animation);
        log_if_verbose!(self, "anim", "{} for {duration:?}", animation.name());
        tokio::time::sleep(self.config.pace(duration)).await;
    }

    /// Start several animations together and wait for the longest
    pub(crate) async fn animate_all(&mut self, animations: Vec<Animation>) {
        let longest = animations
            .iter()
            .map(|animation| self.host.play_animation(animation))
            .max()
            .unwrap_or(Duration::ZERO);
        tokio::time::sleep(self.config.pace(longest)).await;
    }

    /// Start an animation without waiting for it
    pub(crate) fn animate_detached(&mut self, animation: Animation) {
        let _ = self.host.play_animation(&animation);
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    pub fn player_node(&self, player: PlayerId) -> Result<NodeId> {
        self.tree.child(self.tree.root(), NodeKind::Player, player)
    }

    pub fn hand(&self, player: PlayerId) -> Result<NodeId> {
        self.tree.child(self.player_node(player)?, NodeKind::Hand, HAND)
    }

    pub fn used(&self, player: PlayerId) -> Result<NodeId> {
        self.tree.child(self.player_node(player)?, NodeKind::Used, USED)
    }

    pub fn counter(&self, player: PlayerId, name: &str) -> Result<NodeId> {
        self.tree.child(self.player_node(player)?, NodeKind::Counter, name)
    }

    pub fn counter_value(&self, player: PlayerId, name: &str) -> Result<i64> {
        let node = self.counter(player, name)?;
        Ok(self.tree.get(node)?.int_arg(Attr::Value).unwrap_or(0))
    }

    pub(crate) fn adjust_counter(&mut self, player: PlayerId, name: &str, delta: i64) -> Result<i64> {
        let value = self.counter_value(player, name)? + delta;
        self.set_counter(player, name, value)?;
        Ok(value)
    }

    pub(crate) fn set_counter(&mut self, player: PlayerId, name: &str, value: i64) -> Result<()> {
        let node = self.counter(player, name)?;
        self.tree.set_arg(node, Attr::Value, value)
    }

    pub fn region(&self, region: u32) -> Result<NodeId> {
        self.tree.child(self.layout.board, NodeKind::Region, region)
    }

    fn region_of_space(&self, space: u32) -> Result<NodeId> {
        let region = crate::core::content::space_region(space)
            .ok_or_else(|| UiError::InvalidArgs(format!("space {space} is on no region")))?;
        self.region(region)
    }

    pub fn campsite(&self, campsite: u32) -> Result<NodeId> {
        self.tree
            .child(self.region_of_space(campsite)?, NodeKind::Campsite, campsite)
    }

    pub fn souvenir_space(&self, space: u32) -> Result<NodeId> {
        self.tree
            .child(self.region_of_space(space)?, NodeKind::SouvenirSpace, space)
    }

    /// Server id of a card node
    pub(crate) fn card_id(&self, node: NodeId) -> Result<u32> {
        let element = self.tree.get(node)?;
        element.child_id().as_num().ok_or_else(|| {
            UiError::InvalidArgs(format!("{} {node} has no numeric id", element.kind()))
        })
    }

    // ---------------------------------------------------------------------
    // Zoom
    // ---------------------------------------------------------------------

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn zoom_in(&mut self) -> Result<bool> {
        let changed = self.zoom.zoom_in();
        self.apply_zoom(changed)
    }

    pub fn zoom_out(&mut self) -> Result<bool> {
        let changed = self.zoom.zoom_out();
        self.apply_zoom(changed)
    }

    fn apply_zoom(&mut self, changed: bool) -> Result<bool> {
        if changed {
            let root = self.tree.root();
            self.tree.set_arg(root, Attr::Zoom, self.zoom.percent())?;
        }
        Ok(changed)
    }
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for Game<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("nodes", &self.tree.len())
            .field("active", &self.ledger.len())
            .field("buttons", &self.buttons.len())
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::setup::{PlayerSetup, SupplySetup};
    use crate::host::RecordingHost;
    use serde_json::json;

    fn game() -> Game<RecordingHost> {
        let snapshot = GameSetup {
            players: vec![
                PlayerSetup {
                    id: PlayerId::new(1),
                    name: "Alice".into(),
                    color: "red".into(),
                    hand: vec![3, 12],
                    pawn: 1,
                    ..Default::default()
                },
                PlayerSetup {
                    id: PlayerId::new(2),
                    name: "Bob".into(),
                    color: "blue".into(),
                    pawn: 2,
                    ..Default::default()
                },
            ],
            postcard: SupplySetup {
                top: Some(40),
                row: vec![1, 2, 3],
            },
            ..Default::default()
        };
        let host = RecordingHost::new(PlayerId::new(1)).with_active(true);
        Game::setup(host, UiConfig::default(), &snapshot).unwrap()
    }

    #[test]
    fn test_unknown_state_is_ignored() {
        let mut game = game();
        game.on_entering_state("gameEnd", json!({})).unwrap();
        assert_eq!(game.phase(), None);
        game.on_leaving_state("gameEnd").unwrap();
    }

    #[test]
    fn test_leave_releases_ledger_and_buttons() {
        let mut game = game();
        game.on_entering_state("move", json!({"regions": [2, 3], "can_skip": true}))
            .unwrap();
        assert_eq!(game.tree().active_nodes().len(), 2);
        assert!(game.has_button(ButtonAction::Skip));

        game.on_leaving_state("move").unwrap();
        assert!(game.tree().active_nodes().is_empty());
        assert!(game.host().buttons.is_empty());
        assert_eq!(game.phase(), None);
    }

    #[test]
    fn test_entering_over_a_live_state_leaves_it_first() {
        let mut game = game();
        game.on_entering_state("move", json!({"regions": [2]})).unwrap();
        game.on_entering_state("souvenir", json!({"spaces": [14]}))
            .unwrap();
        let active = game.tree().active_nodes();
        assert_eq!(active, vec![game.souvenir_space(14).unwrap()]);
    }

    #[test]
    fn test_zoom_updates_root() {
        let mut game = game();
        assert_eq!(game.zoom().percent(), 100);
        assert!(game.zoom_in().unwrap());
        let root = game.tree().root();
        assert_eq!(game.tree().get(root).unwrap().int_arg(Attr::Zoom), Some(125));
    }

    #[test]
    fn test_setup_rejects_unusable_speed() {
        let config = UiConfig {
            animation_speed: 1e-20,
            ..UiConfig::default()
        };
        let host = RecordingHost::new(PlayerId::new(1));
        let err = Game::setup(host, config, &GameSetup::default()).unwrap_err();
        assert!(matches!(err, UiError::InvalidArgs(_)));
    }

    #[test]
    fn test_counters() {
        let mut game = game();
        assert_eq!(game.counter_value(PlayerId::new(1), "hand").unwrap(), 2);
        assert_eq!(game.adjust_counter(PlayerId::new(2), "score", 4).unwrap(), 4);
        assert!(game.counter(PlayerId::new(9), "score").is_err());
    }
}
