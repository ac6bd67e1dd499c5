//! Action state: the main turn state
//!
//! The active player can play travel cards from hand, send postcards, play
//! gifts and spend bonus actions. Two travel cards can also be played
//! together as a double action, which switches the hand to the two-slot
//! selector until confirmed or canceled.

use super::{activate_all, selected_ids, toggle_selection, PhaseHandler};
use crate::core::{BonusKind, NodeId, NodeKind};
use crate::game::state::{Selector, SelectorMode};
use crate::game::{Game, StateName};
use crate::host::{ButtonAction, Host};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Travel cards after which playing more becomes optional
pub const TRAVELS_PER_TURN: usize = 3;

const DOUBLE_TITLE: &str = "must choose two Travel cards for a double action";

fn default_max_travels() -> u32 {
    TRAVELS_PER_TURN as u32
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusFlags {
    #[serde(default, rename = "move")]
    pub move_action: bool,
    #[serde(default)]
    pub souvenir: bool,
    #[serde(default)]
    pub stamp: bool,
}

impl BonusFlags {
    pub fn get(&self, kind: BonusKind) -> bool {
        match kind {
            BonusKind::Move => self.move_action,
            BonusKind::Souvenir => self.souvenir,
            BonusKind::Stamp => self.stamp,
        }
    }
}

/// What the active player may do this Action state
///
/// Supplied fresh with every entry into the state and dropped on exit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleActions {
    /// Postcards that can be sent now
    #[serde(default)]
    pub send: Vec<u32>,
    /// A camp can be placed
    #[serde(default)]
    pub camp: bool,
    /// Stamp colour -> a stamp of that colour is still available
    #[serde(default)]
    pub stamps: BTreeMap<String, bool>,
    #[serde(default)]
    pub bonus: BonusFlags,
    /// Two travel cards can be combined
    #[serde(default)]
    pub double: bool,
    /// Gifts in the player's area that can be played now
    #[serde(default)]
    pub gifts: Vec<u32>,
}

impl PossibleActions {
    /// Bonus actions that can actually be taken
    ///
    /// A stamp bonus needs at least one colour left; an empty colour map
    /// means the server did not restrict it.
    pub fn available_bonuses(&self) -> Vec<BonusKind> {
        BonusKind::ALL
            .into_iter()
            .filter(|kind| self.bonus.get(*kind))
            .filter(|kind| {
                *kind != BonusKind::Stamp
                    || self.stamps.is_empty()
                    || self.stamps.values().any(|available| *available)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionArgs {
    /// Travel cards already played this turn
    #[serde(default)]
    pub used_travels: Vec<u32>,
    #[serde(default = "default_max_travels")]
    pub max_travels: u32,
    #[serde(default)]
    pub possible: PossibleActions,
}

impl Default for ActionArgs {
    fn default() -> Self {
        ActionArgs {
            used_travels: Vec::new(),
            max_travels: default_max_travels(),
            possible: PossibleActions::default(),
        }
    }
}

/// The four facts the Action title is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleFacts {
    pub used: usize,
    pub max: usize,
    pub bonus: bool,
    pub send: bool,
    pub gift: bool,
}

impl TitleFacts {
    /// Another travel card can be played
    ///
    /// Inequality, not less-than: a double action can push `used` past
    /// `max`, and the player may keep playing.
    pub fn travel(&self) -> bool {
        self.used != self.max
    }

    pub fn travel_required(&self) -> bool {
        self.travel() && self.used < TRAVELS_PER_TURN
    }
}

impl From<&ActionArgs> for TitleFacts {
    fn from(args: &ActionArgs) -> Self {
        TitleFacts {
            used: args.used_travels.len(),
            max: args.max_travels as usize,
            bonus: !args.possible.available_bonuses().is_empty(),
            send: !args.possible.send.is_empty(),
            gift: !args.possible.gifts.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Travel,
    Bonus,
    Send,
    Gift,
}

impl Clause {
    fn phrase(&self) -> &'static str {
        match self {
            Clause::Travel => "play a Travel card",
            Clause::Bonus => "use a Bonus action",
            Clause::Send => "send a Postcard",
            Clause::Gift => "play a Gift card",
        }
    }
}

fn bonus_send_gift(f: &TitleFacts) -> bool {
    f.bonus && f.send && f.gift
}

fn bonus_send(f: &TitleFacts) -> bool {
    f.bonus && f.send
}

fn bonus_gift(f: &TitleFacts) -> bool {
    f.bonus && f.gift
}

fn send_gift(f: &TitleFacts) -> bool {
    f.send && f.gift
}

fn bonus(f: &TitleFacts) -> bool {
    f.bonus
}

fn send(f: &TitleFacts) -> bool {
    f.send
}

fn gift(f: &TitleFacts) -> bool {
    f.gift
}

type TitleRule = (fn(&TitleFacts) -> bool, &'static [Clause]);

/// Evaluated top to bottom; the first match wins
const TITLE_RULES: [TitleRule; 7] = [
    (bonus_send_gift, &[Clause::Bonus, Clause::Send, Clause::Gift]),
    (bonus_send, &[Clause::Bonus, Clause::Send]),
    (bonus_gift, &[Clause::Bonus, Clause::Gift]),
    (send_gift, &[Clause::Send, Clause::Gift]),
    (bonus, &[Clause::Bonus]),
    (send, &[Clause::Send]),
    (gift, &[Clause::Gift]),
];

/// "a", "a or b", "a, b or c"
fn join_clauses(clauses: &[Clause]) -> String {
    let phrases: Vec<&str> = clauses.iter().map(Clause::phrase).collect();
    match phrases.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

/// Status bar phrase for the Action state, without the subject
pub fn action_title(facts: &TitleFacts) -> String {
    let progress = format!("({}/{})", facts.used, facts.max);

    let mut clauses = Vec::with_capacity(4);
    if facts.travel() {
        clauses.push(Clause::Travel);
    }
    if let Some((_, extra)) = TITLE_RULES.iter().find(|(applies, _)| applies(facts)) {
        clauses.extend_from_slice(extra);
    }
    if clauses.is_empty() {
        return format!("must {} {progress}", Clause::Travel.phrase());
    }

    let modal = if facts.travel_required() { "must" } else { "can" };
    format!("{modal} {} {progress}", join_clauses(&clauses))
}

pub struct ActionHandler;

impl ActionHandler {
    fn activate_choices<H: Host>(game: &mut Game<H>, args: &ActionArgs) -> Result<()> {
        let facts = TitleFacts::from(args);
        let viewer = game.viewer();
        let player = game.player_node(viewer)?;

        if facts.travel() {
            let hand = game.hand(viewer)?;
            let cards = game.tree().children(hand, NodeKind::Travel);
            activate_all(game, &cards)?;
        }
        for id in &args.possible.send {
            let card = game.tree().child(player, NodeKind::Postcard, *id)?;
            game.activate(card)?;
        }
        for id in &args.possible.gifts {
            let card = game.tree().child(player, NodeKind::Gift, *id)?;
            game.activate(card)?;
        }

        for kind in args.possible.available_bonuses() {
            game.add_button(ButtonAction::Bonus(kind))?;
        }
        if args.possible.camp {
            game.add_button(ButtonAction::Camp)?;
        }
        if args.possible.double {
            game.add_button(ButtonAction::DoubleAction)?;
        }
        if !args.used_travels.is_empty() {
            game.add_button(ButtonAction::Undo)?;
        }
        if !facts.travel_required() {
            game.add_button(ButtonAction::Pass)?;
        }
        Ok(())
    }

    /// Switch the hand to the two-card selector
    fn start_double<H: Host>(game: &mut Game<H>) -> Result<()> {
        game.release_activation()?;
        game.clear_buttons();
        game.selector = Some(Selector::new(SelectorMode::Double));

        let hand = game.hand(game.viewer())?;
        let cards = game.tree().children(hand, NodeKind::Travel);
        activate_all(game, &cards)?;
        game.add_button(ButtonAction::CancelDouble)?;
        game.set_phase_title(true, DOUBLE_TITLE);
        Ok(())
    }

    /// Leave the double action and restore the normal Action choices
    fn cancel_double<H: Host>(game: &mut Game<H>) -> Result<()> {
        game.release_activation()?;
        game.clear_buttons();
        game.selector = None;

        let args = game.action_args.clone().unwrap_or_default();
        game.set_phase_title(true, &action_title(&TitleFacts::from(&args)));
        Self::activate_choices(game, &args)
    }

    fn dispatch_card<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        let kind = game.tree().get(node)?.kind();
        let id = game.card_id(node)?;
        match kind {
            NodeKind::Travel => game.commit("travel", json!({ "card": id }))?,
            NodeKind::Postcard => game.commit("send", json!({ "postcard": id }))?,
            NodeKind::Gift => game.commit("playGift", json!({ "gift": id }))?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl PhaseHandler for ActionHandler {
    const STATE: StateName = StateName::Action;
    type Args = ActionArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: ActionArgs, active: bool) -> Result<()> {
        game.set_phase_title(active, &action_title(&TitleFacts::from(&args)));
        if active {
            Self::activate_choices(game, &args)?;
        }
        game.action_args = Some(args);
        Ok(())
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        if game.selector.is_some() {
            toggle_selection(game, node)?;
            return Ok(true);
        }
        Self::dispatch_card(game, node)
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        match action {
            ButtonAction::Bonus(kind) => game.commit("bonus", json!({ "bonus": kind.as_str() }))?,
            ButtonAction::Camp => game.commit("chooseCamp", json!({}))?,
            ButtonAction::Pass => game.commit("pass", json!({}))?,
            ButtonAction::Undo => game.commit("undo", json!({}))?,
            ButtonAction::DoubleAction => Self::start_double(game)?,
            ButtonAction::CancelDouble => Self::cancel_double(game)?,
            ButtonAction::ConfirmDouble => {
                let cards = selected_ids(game)?;
                game.selector = None;
                game.commit("double", json!({ "cards": cards }))?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(used: usize, max: usize, bonus: bool, send: bool, gift: bool) -> TitleFacts {
        TitleFacts {
            used,
            max,
            bonus,
            send,
            gift,
        }
    }

    #[test]
    fn test_travel_only() {
        assert_eq!(
            action_title(&facts(1, 3, false, false, false)),
            "must play a Travel card (1/3)"
        );
    }

    #[test]
    fn test_used_equal_to_max_disables_travel() {
        assert_eq!(
            action_title(&facts(3, 3, true, false, false)),
            "can use a Bonus action (3/3)"
        );
    }

    #[test]
    fn test_everything_available() {
        assert_eq!(
            action_title(&facts(2, 3, true, true, true)),
            "must play a Travel card, use a Bonus action, send a Postcard or play a Gift card (2/3)"
        );
    }

    #[test]
    fn test_overplayed_turn_can_still_travel() {
        assert_eq!(
            action_title(&facts(4, 3, false, true, false)),
            "can play a Travel card or send a Postcard (4/3)"
        );
    }

    #[test]
    fn test_nothing_available_falls_back() {
        assert_eq!(
            action_title(&facts(3, 3, false, false, false)),
            "must play a Travel card (3/3)"
        );
    }

    #[test]
    fn test_clause_order_is_fixed() {
        assert_eq!(
            action_title(&facts(3, 3, false, true, true)),
            "can send a Postcard or play a Gift card (3/3)"
        );
        assert_eq!(
            action_title(&facts(0, 3, true, false, true)),
            "must play a Travel card, use a Bonus action or play a Gift card (0/3)"
        );
    }

    #[test]
    fn test_stamp_bonus_needs_a_colour() {
        let mut possible = PossibleActions::default();
        possible.bonus.stamp = true;
        assert_eq!(possible.available_bonuses(), vec![BonusKind::Stamp]);

        possible.stamps.insert("red".into(), false);
        assert!(possible.available_bonuses().is_empty());
    }

    #[test]
    fn test_args_defaults() {
        let args: ActionArgs = serde_json::from_str(r#"{"used_travels": [4]}"#).unwrap();
        assert_eq!(args.max_travels, 3);
        assert!(!args.possible.double);
    }
}
