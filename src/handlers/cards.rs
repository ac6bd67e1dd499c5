//! States that take cards from a supply: Postcard, Guide, Gift, Travel

use super::{activate_all, selected_ids, toggle_selection, PhaseHandler};
use crate::core::{Attr, NodeId};
use crate::game::state::{Selector, SelectorMode};
use crate::game::{Game, StateName};
use crate::host::{ButtonAction, Host};
use crate::tree::supply::DECK_SLOT;
use crate::tree::SupplyRow;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Activate row cards (all of them, or just `only`) and the deck top
fn activate_supply<H: Host>(
    game: &mut Game<H>,
    supply: SupplyRow,
    only: Option<&[u32]>,
    deck: bool,
) -> Result<()> {
    let mut cards = Vec::new();
    for card in supply.row(game.tree()) {
        let id = game.card_id(card)?;
        if only.map_or(true, |ids| ids.contains(&id)) {
            cards.push(card);
        }
    }
    if deck {
        cards.push(supply.take_top(game.tree())?);
    }
    activate_all(game, &cards)
}

/// Payload naming either the deck or one row card
fn pick_payload<H: Host>(game: &Game<H>, node: NodeId, key: &str) -> Result<Value> {
    let element = game.tree().get(node)?;
    if element.int_arg(Attr::Supply) == Some(DECK_SLOT) {
        return Ok(json!({ "deck": true }));
    }
    let id = game.card_id(node)?;
    Ok(json!({ key: id }))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcardArgs {
    /// Row cards that can be taken; all of them when absent
    #[serde(default)]
    pub postcards: Option<Vec<u32>>,
    /// The face-down deck top can be taken
    #[serde(default)]
    pub deck: bool,
    /// The whole row can be discarded and refilled
    #[serde(default)]
    pub can_discard: bool,
}

pub struct PostcardHandler;

impl PhaseHandler for PostcardHandler {
    const STATE: StateName = StateName::Postcard;
    type Args = PostcardArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: PostcardArgs, active: bool) -> Result<()> {
        game.set_phase_title(active, "must take a Postcard");
        if !active {
            return Ok(());
        }
        let supply = game.layout().postcard;
        activate_supply(game, supply, args.postcards.as_deref(), args.deck)?;
        if args.can_discard {
            game.add_button(ButtonAction::DiscardPostcards)?;
        }
        Ok(())
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        let payload = pick_payload(game, node, "postcard")?;
        game.commit("postcard", payload)?;
        Ok(true)
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        if action != ButtonAction::DiscardPostcards {
            return Ok(false);
        }
        game.commit("discardPostcards", json!({}))?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideArgs {}

pub struct GuideHandler;

impl PhaseHandler for GuideHandler {
    const STATE: StateName = StateName::Guide;
    type Args = GuideArgs;

    fn enter<H: Host>(game: &mut Game<H>, _args: GuideArgs, active: bool) -> Result<()> {
        game.set_phase_title(active, "must choose Postcards to keep");
        if !active {
            return Ok(());
        }
        game.selector = Some(Selector::new(SelectorMode::Guide));
        let guide = game.layout().guide;
        let cards = guide.row(game.tree());
        activate_all(game, &cards)
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        toggle_selection(game, node)?;
        Ok(true)
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        if action != ButtonAction::ConfirmGuide {
            return Ok(false);
        }
        let postcards = selected_ids(game)?;
        game.commit("guide", json!({ "postcards": postcards }))?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftArgs {
    #[serde(default)]
    pub gifts: Option<Vec<u32>>,
    #[serde(default)]
    pub deck: bool,
    #[serde(default)]
    pub can_skip: bool,
}

pub struct GiftHandler;

impl PhaseHandler for GiftHandler {
    const STATE: StateName = StateName::Gift;
    type Args = GiftArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: GiftArgs, active: bool) -> Result<()> {
        game.set_phase_title(active, "must take a Gift card");
        if !active {
            return Ok(());
        }
        let supply = game.layout().gift;
        activate_supply(game, supply, args.gifts.as_deref(), args.deck)?;
        if args.can_skip {
            game.add_button(ButtonAction::Skip)?;
        }
        Ok(())
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        let payload = pick_payload(game, node, "gift")?;
        game.commit("gift", payload)?;
        Ok(true)
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        if action != ButtonAction::Skip {
            return Ok(false);
        }
        game.commit("skip", json!({}))?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelArgs {
    #[serde(default)]
    pub travels: Option<Vec<u32>>,
    #[serde(default)]
    pub deck: bool,
}

pub struct TravelHandler;

impl PhaseHandler for TravelHandler {
    const STATE: StateName = StateName::Travel;
    type Args = TravelArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: TravelArgs, active: bool) -> Result<()> {
        game.set_phase_title(active, "must draw a Travel card");
        if !active {
            return Ok(());
        }
        let supply = game.layout().travel;
        activate_supply(game, supply, args.travels.as_deref(), args.deck)
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        let payload = pick_payload(game, node, "travel")?;
        game.commit("drawTravel", payload)?;
        Ok(true)
    }
}
