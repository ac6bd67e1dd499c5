//! Scores, bonuses, turn changes and log cancellation

use super::event::{BonusUsed, CancelList, FinalScores, PlayerOnly, PostcardSent, ScoreChange};
use super::fade_out;
use crate::animation::{Animation, Pace};
use crate::core::{Attr, NodeKind};
use crate::game::Game;
use crate::host::Host;
use crate::Result;

/// Send a postcard (or take the send back); the score popup is detached
pub async fn send<H: Host>(game: &mut Game<H>, n: &PostcardSent, sent: bool) -> Result<()> {
    let player = game.player_node(n.player_id)?;
    let node = game.tree().child(player, NodeKind::Postcard, n.postcard)?;
    game.tree_mut().set_arg(node, Attr::Sent, sent)?;
    let delta = if sent { n.points } else { -n.points };
    if delta != 0 {
        game.adjust_counter(n.player_id, "score", delta)?;
    }
    game.animate(Animation::Flip {
        node,
        face_up: !sent,
    })
    .await;
    if delta != 0 {
        game.animate_detached(Animation::ScorePopup {
            player: n.player_id,
            delta,
            pace: Pace::Score,
        });
    }
    Ok(())
}

pub async fn bonus<H: Host>(game: &mut Game<H>, n: &BonusUsed) -> Result<()> {
    let player = game.player_node(n.player_id)?;
    let node = game.tree().child(player, NodeKind::Bonus, n.bonus.as_str())?;
    game.tree_mut().set_arg(node, Attr::Used, true)?;
    game.animate(Animation::Spin { node }).await;
    Ok(())
}

pub fn score<H: Host>(game: &mut Game<H>, n: &ScoreChange) -> Result<()> {
    game.adjust_counter(n.player_id, "score", n.delta)?;
    game.animate_detached(Animation::ScorePopup {
        player: n.player_id,
        delta: n.delta,
        pace: Pace::Score,
    });
    Ok(())
}

/// Hand the turn over and clear every used pile
pub async fn new_turn<H: Host>(game: &mut Game<H>, n: &PlayerOnly) -> Result<()> {
    let mut used_cards = Vec::new();
    for player in game.players().to_vec() {
        let node = game.player_node(player)?;
        game.tree_mut()
            .set_arg(node, Attr::Current, player == n.player_id)?;
        let used = game.used(player)?;
        used_cards.extend(game.tree().children(used, NodeKind::Travel));
    }
    fade_out(game, used_cards).await
}

pub fn final_score<H: Host>(game: &mut Game<H>, n: &FinalScores) -> Result<()> {
    for (player, total) in &n.scores {
        let previous = game.counter_value(*player, "score")?;
        game.set_counter(*player, "score", *total)?;
        game.logger()
            .minimal(&format!("final score: player {player} {total}"));
        if *total != previous {
            game.animate_detached(Animation::ScorePopup {
                player: *player,
                delta: total - previous,
                pace: Pace::Score,
            });
        }
    }
    Ok(())
}

/// Strike out the log lines of undone notifications
pub fn cancel<H: Host>(game: &mut Game<H>, n: &CancelList) {
    let flagged = game.log_panel_mut().cancel(&n.uids);
    game.logger().event(
        "undo",
        &format!("{} notifications undone, {flagged} log lines canceled", n.uids.len()),
    );
}
