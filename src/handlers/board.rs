//! States that pick a spot on the board: Move, Camp, Souvenir, Stamp
//!
//! All four follow one pattern: the server lists the legal spots, the
//! active player gets those spots clickable plus an optional skip button,
//! and a click dispatches the chosen spot.

use super::{activate_all, PhaseHandler};
use crate::core::content;
use crate::core::{NodeId, NodeKind};
use crate::game::{Game, StateName};
use crate::host::{ButtonAction, Host};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Shared enter: title for everyone, spots and skip for the active player
fn offer<H: Host>(
    game: &mut Game<H>,
    active: bool,
    phrase: &str,
    spots: &[NodeId],
    can_skip: bool,
) -> Result<()> {
    game.set_phase_title(active, phrase);
    if !active {
        return Ok(());
    }
    activate_all(game, spots)?;
    if can_skip {
        game.add_button(ButtonAction::Skip)?;
    }
    Ok(())
}

/// Shared click: send the spot id under `key`
fn choose<H: Host>(game: &mut Game<H>, node: NodeId, action: &str, key: &str) -> Result<bool> {
    let id = game.card_id(node)?;
    game.commit(action, json!({ key: id }))?;
    Ok(true)
}

fn skip<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
    if action != ButtonAction::Skip {
        return Ok(false);
    }
    game.commit("skip", json!({}))?;
    Ok(true)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveArgs {
    /// Regions the pawn can reach
    #[serde(default)]
    pub regions: Vec<u32>,
    #[serde(default)]
    pub can_skip: bool,
}

pub struct MoveHandler;

impl PhaseHandler for MoveHandler {
    const STATE: StateName = StateName::Move;
    type Args = MoveArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: MoveArgs, active: bool) -> Result<()> {
        let spots = args
            .regions
            .iter()
            .map(|region| game.region(*region))
            .collect::<Result<Vec<_>>>()?;
        let phrase = if args.can_skip {
            "may move to a neighbouring region"
        } else {
            "must move to a neighbouring region"
        };
        offer(game, active, phrase, &spots, args.can_skip)
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        choose(game, node, "move", "region")
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        skip(game, action)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampArgs {
    /// Free campsites in the pawn's region
    #[serde(default)]
    pub campsites: Vec<u32>,
    #[serde(default)]
    pub can_skip: bool,
}

pub struct CampHandler;

impl PhaseHandler for CampHandler {
    const STATE: StateName = StateName::Camp;
    type Args = CampArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: CampArgs, active: bool) -> Result<()> {
        let spots = args
            .campsites
            .iter()
            .map(|site| game.campsite(*site))
            .collect::<Result<Vec<_>>>()?;
        offer(game, active, "must choose a campsite", &spots, args.can_skip)
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        choose(game, node, "camp", "campsite")
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        skip(game, action)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SouvenirArgs {
    /// Souvenir spaces with a souvenir the player can take
    #[serde(default)]
    pub spaces: Vec<u32>,
    #[serde(default)]
    pub can_skip: bool,
}

pub struct SouvenirHandler;

impl PhaseHandler for SouvenirHandler {
    const STATE: StateName = StateName::Souvenir;
    type Args = SouvenirArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: SouvenirArgs, active: bool) -> Result<()> {
        let spots = args
            .spaces
            .iter()
            .map(|space| game.souvenir_space(*space))
            .collect::<Result<Vec<_>>>()?;
        offer(game, active, "must take a souvenir", &spots, args.can_skip)
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        choose(game, node, "souvenir", "space")
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        skip(game, action)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampArgs {
    /// Stamp colour -> still available
    #[serde(default)]
    pub stamps: BTreeMap<String, bool>,
    #[serde(default)]
    pub can_skip: bool,
}

pub struct StampHandler;

impl PhaseHandler for StampHandler {
    const STATE: StateName = StateName::Stamp;
    type Args = StampArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: StampArgs, active: bool) -> Result<()> {
        let mut spots = Vec::new();
        for info in content::REGIONS.iter() {
            if args.stamps.get(info.color).copied().unwrap_or(false) {
                let region = game.region(info.id)?;
                spots.push(game.tree().child(region, NodeKind::Stamp, info.id)?);
            }
        }
        offer(game, active, "must choose a stamp", &spots, args.can_skip)
    }

    fn click<H: Host>(game: &mut Game<H>, node: NodeId) -> Result<bool> {
        choose(game, node, "stamp", "region")
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        skip(game, action)
    }
}
