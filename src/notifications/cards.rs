//! Cards moving between supplies, hands and player areas

use super::event::{
    CardPlay, CardTaken, DoublePlay, GiftPlay, GuideChoice, GuideReveal, PublicDraw, Refill,
};
use super::{dom_id, fade_out, take_from_supply};
use crate::animation::{self, Animation, Pace};
use crate::core::{content, ArgValue, Attr, ChildId, NodeId, NodeKind, PlayerId};
use crate::game::setup::card_args;
use crate::game::Game;
use crate::host::Host;
use crate::tree::SupplyRow;
use crate::Result;

/// Move travel cards from hand (or from nowhere, for hidden hands) to the
/// used pile
///
/// The viewer's own hand is fully known, so a card missing from it is an
/// error.
async fn play_travel_cards<H: Host>(
    game: &mut Game<H>,
    player: PlayerId,
    cards: &[u32],
) -> Result<()> {
    let hand = game.hand(player)?;
    let used = game.used(player)?;
    let own_hand = player == game.viewer();
    let mut slides = Vec::with_capacity(cards.len());
    for card in cards {
        let in_hand = if own_hand {
            Some(game.tree().child(hand, NodeKind::Travel, *card)?)
        } else {
            game.tree().find(hand, NodeKind::Travel, *card)
        };
        let node = match in_hand {
            Some(node) => {
                game.tree_mut().add_to_parent(node, used, None)?;
                node
            }
            None => game.tree_mut().create(
                used,
                *card,
                NodeKind::Travel,
                card_args(NodeKind::Travel, *card, true),
            )?,
        };
        game.tree_mut().set_arg(node, Attr::Used, true)?;
        game.adjust_counter(player, "hand", -1)?;
        slides.push(Animation::Slide {
            node,
            to: used,
            pace: Pace::Standard,
        });
    }
    game.animate_all(slides).await;
    Ok(())
}

pub async fn travel<H: Host>(game: &mut Game<H>, n: &CardPlay) -> Result<()> {
    play_travel_cards(game, n.player_id, &[n.card]).await
}

pub async fn double<H: Host>(game: &mut Game<H>, n: &DoublePlay) -> Result<()> {
    play_travel_cards(game, n.player_id, &n.cards).await
}

pub async fn undo_travel<H: Host>(game: &mut Game<H>, n: &CardPlay) -> Result<()> {
    let used = game.used(n.player_id)?;
    let node = game.tree().child(used, NodeKind::Travel, n.card)?;
    game.adjust_counter(n.player_id, "hand", 1)?;
    if n.player_id != game.viewer() {
        return fade_out(game, vec![node]).await;
    }
    let hand = game.hand(n.player_id)?;
    game.tree_mut().add_to_parent(node, hand, None)?;
    game.tree_mut().clear_arg(node, Attr::Used)?;
    game.animate(Animation::Slide {
        node,
        to: hand,
        pace: Pace::Standard,
    })
    .await;
    Ok(())
}

/// Move a card taken from a supply under `dest`, face up under its real id
fn claim<H: Host>(
    game: &mut Game<H>,
    node: NodeId,
    dest: NodeId,
    kind: NodeKind,
    card: u32,
) -> Result<()> {
    let tree = game.tree_mut();
    tree.add_to_parent(node, dest, Some(ChildId::Num(card)))?;
    tree.clear_arg(node, Attr::Supply)?;
    tree.set_arg(node, Attr::FaceUp, true)?;
    if let Some(text) = content::tooltip(kind, card) {
        tree.set_arg(node, Attr::Tooltip, text)?;
    }
    Ok(())
}

async fn take_card<H: Host>(
    game: &mut Game<H>,
    supply: SupplyRow,
    n: &CardTaken,
    dest: NodeId,
) -> Result<NodeId> {
    let node = take_from_supply(game, supply, Some(n.card), n.deck)?;
    claim(game, node, dest, supply.kind(), n.card)?;
    game.animate(Animation::Slide {
        node,
        to: dest,
        pace: Pace::Standard,
    })
    .await;
    Ok(node)
}

pub async fn postcard<H: Host>(game: &mut Game<H>, n: &CardTaken) -> Result<()> {
    let supply = game.layout().postcard;
    let player = game.player_node(n.player_id)?;
    let node = take_from_supply(game, supply, Some(n.card), n.deck)?;
    claim(game, node, player, NodeKind::Postcard, n.card)?;
    game.tree_mut().set_arg(node, Attr::Sent, false)?;
    game.animate(Animation::Slide {
        node,
        to: player,
        pace: Pace::Standard,
    })
    .await;
    Ok(())
}

pub async fn gift<H: Host>(game: &mut Game<H>, n: &CardTaken) -> Result<()> {
    let supply = game.layout().gift;
    let player = game.player_node(n.player_id)?;
    take_card(game, supply, n, player).await?;
    Ok(())
}

/// The drawing player's own view of a travel draw
pub async fn draw_travel<H: Host>(game: &mut Game<H>, n: &CardTaken) -> Result<()> {
    let supply = game.layout().travel;
    let hand = game.hand(n.player_id)?;
    game.adjust_counter(n.player_id, "hand", 1)?;
    take_card(game, supply, n, hand).await?;
    Ok(())
}

/// Everyone else's view: the card leaves the supply towards the player
pub async fn draw_travel_public<H: Host>(game: &mut Game<H>, n: &PublicDraw) -> Result<()> {
    if n.player_id == game.viewer() {
        log_if_verbose!(game, "notif", "own travel draw already shown");
        return Ok(());
    }
    let supply = game.layout().travel;
    let player = game.player_node(n.player_id)?;
    let node = take_from_supply(game, supply, n.card, n.deck)?;
    game.adjust_counter(n.player_id, "hand", 1)?;
    game.animate(Animation::Slide {
        node,
        to: player,
        pace: Pace::Standard,
    })
    .await;
    game.tree_mut().remove(node)
}

/// Old deck top joins the row face up and a new face-down top appears
pub async fn refill<H: Host>(game: &mut Game<H>, supply: SupplyRow, n: &Refill) -> Result<()> {
    let old_top = supply.top(game.tree());
    let new_top = n
        .top
        .map(|id| (ChildId::Num(id), card_args(supply.kind(), id, false)));
    let created = supply.refill(game.tree_mut(), new_top)?;

    let mut slides = Vec::new();
    if let Some(old) = old_top {
        game.tree_mut().set_arg(old, Attr::FaceUp, true)?;
        slides.push(Animation::Slide {
            node: old,
            to: supply.container(),
            pace: Pace::Refill,
        });
    }
    if let Some(node) = created {
        slides.push(Animation::Slide {
            node,
            to: supply.container(),
            pace: Pace::Refill,
        });
    }
    game.animate_all(slides).await;
    Ok(())
}

pub async fn reshuffle_travel<H: Host>(game: &mut Game<H>, n: &Refill) -> Result<()> {
    let supply = game.layout().travel;
    if let Some(top) = supply.top(game.tree()) {
        game.tree_mut().remove(top)?;
    }
    let new_top = n
        .top
        .map(|id| (ChildId::Num(id), card_args(NodeKind::Travel, id, false)));
    if let Some(node) = supply.refill(game.tree_mut(), new_top)? {
        game.animate(Animation::Spin { node }).await;
    }
    Ok(())
}

pub async fn discard_postcards<H: Host>(game: &mut Game<H>) -> Result<()> {
    let supply = game.layout().postcard;
    for card in supply.row(game.tree()) {
        let dom_id = dom_id(game, card)?;
        game.animate_detached(Animation::Fade { dom_id });
    }
    let wait = game.config().pace(animation::DISCARD);
    let discarded = supply.discard_all_but_top(game.tree_mut(), wait).await?;
    log_if_verbose!(game, "notif", "discarded {} postcards", discarded.len());
    Ok(())
}

/// Reveal the guide postcards one by one
///
/// Only the guiding player sees their faces.
pub async fn guide<H: Host>(game: &mut Game<H>, n: &GuideReveal) -> Result<()> {
    let guide = game.layout().guide;
    let face_up = n.player_id == game.viewer();
    let pacing = game.config().reveal_pacing();
    for (i, id) in n.postcards.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(pacing).await;
        }
        let node = game.tree_mut().create(
            guide.container(),
            *id,
            NodeKind::Postcard,
            card_args(NodeKind::Postcard, *id, false),
        )?;
        guide.rearrange(game.tree_mut(), None)?;
        if face_up {
            game.tree_mut().set_arg(node, Attr::FaceUp, true)?;
            game.animate(Animation::Flip {
                node,
                face_up: true,
            })
            .await;
        } else {
            game.animate(Animation::Slide {
                node,
                to: guide.container(),
                pace: Pace::Refill,
            })
            .await;
        }
    }
    Ok(())
}

/// Chosen guide postcards go to the player, the rest are discarded
pub async fn guide_choose<H: Host>(game: &mut Game<H>, n: &GuideChoice) -> Result<()> {
    let guide = game.layout().guide;
    for id in &n.chosen {
        game.tree().child(guide.container(), NodeKind::Postcard, *id)?;
    }
    let player = game.player_node(n.player_id)?;

    let mut animations = Vec::new();
    let mut rest = Vec::new();
    for node in guide.row(game.tree()) {
        let id = game.card_id(node)?;
        if n.chosen.contains(&id) {
            claim(game, node, player, NodeKind::Postcard, id)?;
            game.tree_mut().set_arg(node, Attr::Sent, false)?;
            animations.push(Animation::Slide {
                node,
                to: player,
                pace: Pace::Standard,
            });
        } else {
            animations.push(Animation::Fade {
                dom_id: dom_id(game, node)?,
            });
            rest.push(node);
        }
    }
    game.animate_all(animations).await;
    for node in rest {
        game.tree_mut().remove(node)?;
    }
    Ok(())
}

fn gift_of<H: Host>(game: &Game<H>, player: PlayerId, gift: u32) -> Result<NodeId> {
    let player = game.player_node(player)?;
    game.tree().child(player, NodeKind::Gift, gift)
}

pub async fn play_gift<H: Host>(game: &mut Game<H>, n: &GiftPlay) -> Result<()> {
    let node = gift_of(game, n.player_id, n.gift)?;
    game.tree_mut().set_arg(node, Attr::Used, ArgValue::Bool(true))?;
    game.animate(Animation::Spin { node }).await;
    Ok(())
}

pub async fn discard_gift<H: Host>(game: &mut Game<H>, n: &GiftPlay) -> Result<()> {
    let node = gift_of(game, n.player_id, n.gift)?;
    fade_out(game, vec![node]).await
}
