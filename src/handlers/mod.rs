//! State handlers, one per server state
//!
//! On entry a handler sets the status bar title for every viewer and, for
//! the active player only, makes exactly the legal elements clickable and
//! adds the state's buttons. Handlers have no exit hook: every activation
//! and button goes through the game's ledger, and leaving a state releases
//! the ledger as a whole, so nothing survives a state change.

pub mod action;
pub mod board;
pub mod cards;
pub mod turn;

use crate::core::{Attr, NodeId};
use crate::game::state::Selector;
use crate::game::{Game, StateName};
use crate::host::{ButtonAction, Host};
use crate::tree::SelectionEffect;
use crate::{Result, UiError};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use action::{action_title, ActionArgs, ActionHandler, PossibleActions, TitleFacts};
pub use board::{CampHandler, MoveHandler, SouvenirHandler, StampHandler};
pub use cards::{GiftHandler, GuideHandler, PostcardHandler, TravelHandler};
pub use turn::{ConfirmHandler, StarHandler};

pub trait PhaseHandler {
    const STATE: StateName;

    /// Arguments the server sends with the state
    type Args: DeserializeOwned + Default;

    fn enter<H: Host>(game: &mut Game<H>, args: Self::Args, active: bool) -> Result<()>;

    /// Click on a node this state activated
    fn click<H: Host>(_game: &mut Game<H>, _node: NodeId) -> Result<bool> {
        Ok(false)
    }

    /// Click on a button this state added
    fn button<H: Host>(_game: &mut Game<H>, _action: ButtonAction) -> Result<bool> {
        Ok(false)
    }
}

/// Run `$body` with `$handler` bound to the handler type of `$state`
macro_rules! with_handler {
    ($state:expr, $handler:ident => $body:expr) => {
        match $state {
            StateName::Action => {
                type $handler = action::ActionHandler;
                $body
            }
            StateName::Camp => {
                type $handler = board::CampHandler;
                $body
            }
            StateName::Confirm => {
                type $handler = turn::ConfirmHandler;
                $body
            }
            StateName::Gift => {
                type $handler = cards::GiftHandler;
                $body
            }
            StateName::Guide => {
                type $handler = cards::GuideHandler;
                $body
            }
            StateName::Move => {
                type $handler = board::MoveHandler;
                $body
            }
            StateName::Postcard => {
                type $handler = cards::PostcardHandler;
                $body
            }
            StateName::Souvenir => {
                type $handler = board::SouvenirHandler;
                $body
            }
            StateName::Stamp => {
                type $handler = board::StampHandler;
                $body
            }
            StateName::Star => {
                type $handler = turn::StarHandler;
                $body
            }
            StateName::Travel => {
                type $handler = cards::TravelHandler;
                $body
            }
        }
    };
}

fn parse_args<T: DeserializeOwned + Default>(state: StateName, args: Value) -> Result<T> {
    if args.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(args)
        .map_err(|e| UiError::InvalidArgs(format!("{state} state args: {e}")))
}

pub(crate) fn enter<H: Host>(
    game: &mut Game<H>,
    state: StateName,
    args: Value,
    active: bool,
) -> Result<()> {
    with_handler!(state, P => {
        let args = parse_args::<<P as PhaseHandler>::Args>(P::STATE, args)?;
        P::enter(game, args, active)
    })
}

pub(crate) fn click<H: Host>(game: &mut Game<H>, state: StateName, node: NodeId) -> Result<bool> {
    with_handler!(state, P => P::click(game, node))
}

pub(crate) fn button<H: Host>(
    game: &mut Game<H>,
    state: StateName,
    action: ButtonAction,
) -> Result<bool> {
    with_handler!(state, P => P::button(game, action))
}

/// Activate every node in `nodes`
pub(crate) fn activate_all<H: Host>(game: &mut Game<H>, nodes: &[NodeId]) -> Result<()> {
    for node in nodes {
        game.activate(*node)?;
    }
    Ok(())
}

/// Feed a click into the selector and sync the confirm button
pub(crate) fn toggle_selection<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<()> {
    let Some(selector) = game.selector else {
        return Err(UiError::InvalidArgs(format!(
            "selection click on {node} without a selector"
        )));
    };
    let (selection, effects) = selector.selection.click(node);
    for effect in effects {
        match effect {
            SelectionEffect::Select(card) => game.tree_mut().set_arg(card, Attr::Selected, true)?,
            SelectionEffect::Unselect(card) => game.tree_mut().clear_arg(card, Attr::Selected)?,
        }
    }
    let selector = Selector {
        selection,
        ..selector
    };
    game.selector = Some(selector);

    let confirm = selector.confirm_action();
    if selection.ready(selector.min()) {
        game.add_button(confirm)?;
    } else {
        game.remove_button(confirm);
    }
    Ok(())
}

/// Server ids of the selected cards, slot 1 first
pub(crate) fn selected_ids<H: Host>(game: &Game<H>) -> Result<Vec<u32>> {
    let cards = game.selection().map(|s| s.cards()).unwrap_or_default();
    cards.into_iter().map(|card| game.card_id(card)).collect()
}
