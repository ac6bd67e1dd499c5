//! Notification player
//!
//! Notifications arrive strictly in order and each one is played to the
//! end, including its animations, before the next one starts. The tree is
//! mutated first and the animation then shows the change, so the final
//! table does not depend on how long any animation takes.

pub mod board;
pub mod cards;
pub mod event;
pub mod scoring;

pub use event::{Notification, NotificationEvent};

use crate::animation::Animation;
use crate::core::{ArgValue, Attr, NodeId, PlayerId};
use crate::game::Game;
use crate::host::Host;
use crate::tree::SupplyRow;
use crate::{Result, UiError};

pub struct NotificationPlayer;

impl NotificationPlayer {
    /// Play one notification to completion
    pub async fn play<H: Host>(game: &mut Game<H>, notification: &Notification) -> Result<()> {
        if !notification.log.is_empty() {
            game.log_panel_mut()
                .place(&notification.uid, &notification.log);
        }
        game.logger().event(
            "notif",
            &format!("{} [{}]", notification.event.name(), notification.uid),
        );

        // Whatever the viewer could click is stale once their own move lands
        if notification.event.player() == Some(game.viewer()) {
            game.release_activation()?;
        }

        use NotificationEvent::*;
        match &notification.event {
            Travel(n) => cards::travel(game, n).await,
            Double(n) => cards::double(game, n).await,
            UndoTravel(n) => cards::undo_travel(game, n).await,
            Postcard(n) => cards::postcard(game, n).await,
            RefillPostcards(n) => {
                let supply = game.layout().postcard;
                cards::refill(game, supply, n).await
            }
            DiscardPostcards(_) => cards::discard_postcards(game).await,
            Guide(n) => cards::guide(game, n).await,
            GuideChoose(n) => cards::guide_choose(game, n).await,
            Gift(n) => cards::gift(game, n).await,
            RefillGift(n) => {
                let supply = game.layout().gift;
                cards::refill(game, supply, n).await
            }
            PlayGift(n) => cards::play_gift(game, n).await,
            DiscardGift(n) => cards::discard_gift(game, n).await,
            DrawTravel(n) => cards::draw_travel(game, n).await,
            DrawTravelPublic(n) => cards::draw_travel_public(game, n).await,
            RefillTravel(n) => {
                let supply = game.layout().travel;
                cards::refill(game, supply, n).await
            }
            ReshuffleTravel(n) => cards::reshuffle_travel(game, n).await,
            Move(n) | UndoMove(n) => board::move_pawn(game, n).await,
            Camp(n) => board::camp(game, n).await,
            UndoCamp(n) => board::undo_camp(game, n).await,
            Souvenir(n) => board::souvenir(game, n).await,
            UndoSouvenir(n) => board::undo_souvenir(game, n).await,
            Stamp(n) => board::stamp(game, n).await,
            UndoStamp(n) => board::undo_stamp(game, n).await,
            Star(n) => board::star(game, n).await,
            Send(n) => scoring::send(game, n, true).await,
            UndoSend(n) => scoring::send(game, n, false).await,
            Bonus(n) => scoring::bonus(game, n).await,
            Score(n) => scoring::score(game, n),
            NewTurn(n) => scoring::new_turn(game, n).await,
            FinalScore(n) => scoring::final_score(game, n),
            CancelNotifications(n) => {
                scoring::cancel(game, n);
                Ok(())
            }
        }
    }

    /// Play notifications one after another
    pub async fn play_all<H, I>(game: &mut Game<H>, notifications: I) -> Result<()>
    where
        H: Host,
        I: IntoIterator<Item = Notification>,
    {
        for notification in notifications {
            Self::play(game, &notification).await?;
        }
        Ok(())
    }
}

fn dom_id<H: Host>(game: &Game<H>, node: NodeId) -> Result<String> {
    game.tree()
        .presentation()
        .element(node)
        .map(|e| e.dom_id.clone())
        .ok_or(UiError::NodeNotFound(node))
}

/// Fade nodes out together, then destroy them
async fn fade_out<H: Host>(game: &mut Game<H>, nodes: Vec<NodeId>) -> Result<()> {
    if nodes.is_empty() {
        return Ok(());
    }
    let fades = nodes
        .iter()
        .map(|node| dom_id(game, *node).map(|dom_id| Animation::Fade { dom_id }))
        .collect::<Result<Vec<_>>>()?;
    game.animate_all(fades).await;
    for node in nodes {
        game.tree_mut().remove(node)?;
    }
    Ok(())
}

fn player_color<H: Host>(game: &Game<H>, player: PlayerId) -> Result<String> {
    let node = game.player_node(player)?;
    Ok(game
        .tree()
        .arg(node, Attr::Color)
        .and_then(ArgValue::as_str)
        .unwrap_or("grey")
        .to_string())
}

/// Pick a card out of a supply and close the gap behind it
///
/// The picked card keeps its slot while the rest of the row shifts; the
/// caller moves it out afterwards.
fn take_from_supply<H: Host>(
    game: &mut Game<H>,
    supply: SupplyRow,
    card: Option<u32>,
    deck: bool,
) -> Result<NodeId> {
    let node = if deck {
        supply.take_top(game.tree())?
    } else {
        let card = card.ok_or_else(|| {
            UiError::InvalidArgs(format!("{} taken from the row without an id", supply.kind()))
        })?;
        let node = game.tree().child(supply.container(), supply.kind(), card)?;
        supply.rearrange(game.tree_mut(), Some(node))?;
        node
    };
    Ok(node)
}


#[cfg(test)]
mod tests {
    use super::test_support::game;
    use super::*;
    use serde_json::json;

    fn notif(uid: &str, name: &str, log: &str, args: serde_json::Value) -> Notification {
        Notification::from_json(json!({"uid": uid, "type": name, "log": log, "args": args}))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_places_log_line() {
        let mut game = game();
        let n = notif("n1", "score", "Bob scores 2", json!({"player_id": 2, "delta": 2}));
        NotificationPlayer::play(&mut game, &n).await.unwrap();
        assert_eq!(game.log_panel().line_ids("n1").len(), 2);
        assert_eq!(game.counter_value(PlayerId::new(2), "score").unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_reports_to_logger() {
        let mut game = game();
        game.logger_mut().start_capture();
        let n = notif("n4", "bonus", "", json!({"player_id": 1, "bonus": "move"}));
        NotificationPlayer::play(&mut game, &n).await.unwrap();
        assert_eq!(game.logger().messages("notif"), vec!["bonus [n4]".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_notification_has_no_log_line() {
        let mut game = game();
        let n = notif("n2", "refillGift", "", json!({"top": 22}));
        NotificationPlayer::play(&mut game, &n).await.unwrap();
        assert!(game.log_panel().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_viewer_notification_releases_activation() {
        let mut game = game();
        game.on_entering_state("move", json!({"regions": [2, 3]}))
            .unwrap();
        assert_eq!(game.tree().active_nodes().len(), 2);

        let n = notif("n3", "move", "", json!({"player_id": 1, "region": 2}));
        NotificationPlayer::play(&mut game, &n).await.unwrap();
        assert!(game.tree().active_nodes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_all_is_sequential() {
        let mut game = game();
        let start = tokio::time::Instant::now();
        let script = vec![
            notif("a", "move", "", json!({"player_id": 2, "region": 3})),
            notif("b", "camp", "", json!({"player_id": 2, "campsite": 31})),
        ];
        NotificationPlayer::play_all(&mut game, script).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(1600));
        game.tree()
            .resolve_path("board:board/region:3/campsite:31/camp:2")
            .unwrap();
    }
}
