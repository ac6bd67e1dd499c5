//! Pieces on the board: pawns, camps, souvenirs, stamps and stars

use super::event::{CampPlaced, PawnMove, SouvenirTaken, StampPlaced, StarPlaced};
use super::{fade_out, player_color};
use crate::animation::{Animation, Pace};
use crate::core::{Attr, NodeId, NodeKind, PlayerId};
use crate::game::setup::region_color;
use crate::game::Game;
use crate::host::Host;
use crate::node_args;
use crate::{Result, UiError};

fn find_pawn<H: Host>(game: &Game<H>, player: PlayerId) -> Result<NodeId> {
    let board = game.layout().board;
    game.tree()
        .children(board, NodeKind::Region)
        .into_iter()
        .find_map(|region| game.tree().find(region, NodeKind::Pawn, player))
        .ok_or_else(|| UiError::ChildNotFound {
            parent: board,
            kind: NodeKind::Pawn,
            child_id: player.into(),
        })
}

/// Move or undo-move: the pawn ends up in `region` either way
pub async fn move_pawn<H: Host>(game: &mut Game<H>, n: &PawnMove) -> Result<()> {
    let pawn = find_pawn(game, n.player_id)?;
    let target = game.region(n.region)?;
    game.tree_mut().add_to_parent(pawn, target, None)?;
    game.animate(Animation::Slide {
        node: pawn,
        to: target,
        pace: Pace::Standard,
    })
    .await;
    Ok(())
}

pub async fn camp<H: Host>(game: &mut Game<H>, n: &CampPlaced) -> Result<()> {
    let campsite = game.campsite(n.campsite)?;
    let color = player_color(game, n.player_id)?;
    let camp = game.tree_mut().create(
        campsite,
        n.player_id,
        NodeKind::Camp,
        node_args![
            Attr::Color => color.as_str(),
            Attr::Player => n.player_id.as_u32(),
        ],
    )?;
    game.adjust_counter(n.player_id, "camps", -1)?;
    game.animate(Animation::Slide {
        node: camp,
        to: campsite,
        pace: Pace::Standard,
    })
    .await;
    Ok(())
}

pub async fn undo_camp<H: Host>(game: &mut Game<H>, n: &CampPlaced) -> Result<()> {
    let campsite = game.campsite(n.campsite)?;
    let camp = game.tree().child(campsite, NodeKind::Camp, n.player_id)?;
    game.adjust_counter(n.player_id, "camps", 1)?;
    fade_out(game, vec![camp]).await
}

pub async fn souvenir<H: Host>(game: &mut Game<H>, n: &SouvenirTaken) -> Result<()> {
    let space = game.souvenir_space(n.space)?;
    let token = game.tree().child(space, NodeKind::Souvenir, n.space)?;
    let player = game.player_node(n.player_id)?;
    game.tree_mut().add_to_parent(token, player, None)?;
    game.animate(Animation::Slide {
        node: token,
        to: player,
        pace: Pace::Standard,
    })
    .await;
    Ok(())
}

pub async fn undo_souvenir<H: Host>(game: &mut Game<H>, n: &SouvenirTaken) -> Result<()> {
    let player = game.player_node(n.player_id)?;
    let token = game.tree().child(player, NodeKind::Souvenir, n.space)?;
    let space = game.souvenir_space(n.space)?;
    game.tree_mut().add_to_parent(token, space, None)?;
    game.animate(Animation::Slide {
        node: token,
        to: space,
        pace: Pace::Standard,
    })
    .await;
    Ok(())
}

fn postcard_of<H: Host>(game: &Game<H>, player: PlayerId, postcard: u32) -> Result<NodeId> {
    let player = game.player_node(player)?;
    game.tree().child(player, NodeKind::Postcard, postcard)
}

pub async fn stamp<H: Host>(game: &mut Game<H>, n: &StampPlaced) -> Result<()> {
    let postcard = postcard_of(game, n.player_id, n.postcard)?;
    let stamp = game.tree_mut().create(
        postcard,
        n.region,
        NodeKind::Stamp,
        node_args![Attr::Color => region_color(n.region)],
    )?;
    game.animate(Animation::Slide {
        node: stamp,
        to: postcard,
        pace: Pace::Standard,
    })
    .await;
    Ok(())
}

pub async fn undo_stamp<H: Host>(game: &mut Game<H>, n: &StampPlaced) -> Result<()> {
    let postcard = postcard_of(game, n.player_id, n.postcard)?;
    let stamp = game.tree().child(postcard, NodeKind::Stamp, n.region)?;
    fade_out(game, vec![stamp]).await
}

/// Star placed in a region; the star scoring display is awaited
pub async fn star<H: Host>(game: &mut Game<H>, n: &StarPlaced) -> Result<()> {
    let region = game.region(n.region)?;
    let color = player_color(game, n.player_id)?;
    let star = game.tree_mut().create(
        region,
        n.player_id,
        NodeKind::Star,
        node_args![Attr::Color => color.as_str()],
    )?;
    game.adjust_counter(n.player_id, "stars", 1)?;
    if n.points != 0 {
        game.adjust_counter(n.player_id, "score", n.points)?;
    }
    game.animate(Animation::Slide {
        node: star,
        to: region,
        pace: Pace::Standard,
    })
    .await;
    if n.points != 0 {
        game.animate(Animation::ScorePopup {
            player: n.player_id,
            delta: n.points,
            pace: Pace::StarScore,
        })
        .await;
    }
    Ok(())
}
