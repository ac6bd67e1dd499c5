//! Notification names and payloads
//!
//! The host delivers each notification as `{uid, type, log, args}`. The
//! `type` picks the variant and `args` is parsed into that variant's
//! payload; an unknown `type` is a structural error.

use crate::core::{BonusKind, PlayerId};
use crate::{Result, UiError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlay {
    pub player_id: PlayerId,
    pub card: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoublePlay {
    pub player_id: PlayerId,
    pub cards: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnMove {
    pub player_id: PlayerId,
    /// Region the pawn ends up in
    pub region: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampPlaced {
    pub player_id: PlayerId,
    pub campsite: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SouvenirTaken {
    pub player_id: PlayerId,
    pub space: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampPlaced {
    pub player_id: PlayerId,
    pub region: u32,
    pub postcard: u32,
}

/// A card taken from a supply, from the row or the deck top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTaken {
    pub player_id: PlayerId,
    pub card: u32,
    #[serde(default)]
    pub deck: bool,
}

/// Another player's draw: the card id is hidden when drawn from the deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicDraw {
    pub player_id: PlayerId,
    #[serde(default)]
    pub card: Option<u32>,
    #[serde(default)]
    pub deck: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refill {
    /// New face-down deck top, if the deck is not empty
    #[serde(default)]
    pub top: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOnly {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideReveal {
    pub player_id: PlayerId,
    pub postcards: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideChoice {
    pub player_id: PlayerId,
    pub chosen: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcardSent {
    pub player_id: PlayerId,
    pub postcard: u32,
    #[serde(default)]
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftPlay {
    pub player_id: PlayerId,
    pub gift: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusUsed {
    pub player_id: PlayerId,
    pub bonus: BonusKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarPlaced {
    pub player_id: PlayerId,
    pub region: u32,
    #[serde(default)]
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub player_id: PlayerId,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelList {
    #[serde(alias = "notifIds")]
    pub uids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScores {
    pub scores: BTreeMap<PlayerId, i64>,
}

/// One variant per server notification name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Travel(CardPlay),
    Double(DoublePlay),
    Move(PawnMove),
    UndoMove(PawnMove),
    Camp(CampPlaced),
    UndoCamp(CampPlaced),
    Souvenir(SouvenirTaken),
    UndoSouvenir(SouvenirTaken),
    Stamp(StampPlaced),
    UndoStamp(StampPlaced),
    Postcard(CardTaken),
    RefillPostcards(Refill),
    DiscardPostcards(PlayerOnly),
    Guide(GuideReveal),
    GuideChoose(GuideChoice),
    Send(PostcardSent),
    UndoSend(PostcardSent),
    Gift(CardTaken),
    RefillGift(Refill),
    PlayGift(GiftPlay),
    DiscardGift(GiftPlay),
    DrawTravel(CardTaken),
    DrawTravelPublic(PublicDraw),
    RefillTravel(Refill),
    ReshuffleTravel(Refill),
    Bonus(BonusUsed),
    Star(StarPlaced),
    Score(ScoreChange),
    NewTurn(PlayerOnly),
    UndoTravel(CardPlay),
    CancelNotifications(CancelList),
    FinalScore(FinalScores),
}

fn payload<T: DeserializeOwned>(name: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| UiError::InvalidArgs(format!("{name}: {e}")))
}

impl NotificationEvent {
    /// Parse the payload of the notification called `name`
    pub fn parse(name: &str, args: Value) -> Result<Self> {
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        use NotificationEvent::*;
        let event = match name {
            "travel" => Travel(payload(name, args)?),
            "double" => Double(payload(name, args)?),
            "move" => Move(payload(name, args)?),
            "undoMove" => UndoMove(payload(name, args)?),
            "camp" => Camp(payload(name, args)?),
            "undoCamp" => UndoCamp(payload(name, args)?),
            "souvenir" => Souvenir(payload(name, args)?),
            "undoSouvenir" => UndoSouvenir(payload(name, args)?),
            "stamp" => Stamp(payload(name, args)?),
            "undoStamp" => UndoStamp(payload(name, args)?),
            "postcard" => Postcard(payload(name, args)?),
            "refillPostcards" => RefillPostcards(payload(name, args)?),
            "discardPostcards" => DiscardPostcards(payload(name, args)?),
            "guide" => Guide(payload(name, args)?),
            "guideChoose" => GuideChoose(payload(name, args)?),
            "send" => Send(payload(name, args)?),
            "undoSend" => UndoSend(payload(name, args)?),
            "gift" => Gift(payload(name, args)?),
            "refillGift" => RefillGift(payload(name, args)?),
            "playGift" => PlayGift(payload(name, args)?),
            "discardGift" => DiscardGift(payload(name, args)?),
            "drawTravel" => DrawTravel(payload(name, args)?),
            "drawTravelPublic" => DrawTravelPublic(payload(name, args)?),
            "refillTravel" => RefillTravel(payload(name, args)?),
            "reshuffleTravel" => ReshuffleTravel(payload(name, args)?),
            "bonus" => Bonus(payload(name, args)?),
            "star" => Star(payload(name, args)?),
            "score" => Score(payload(name, args)?),
            "newTurn" => NewTurn(payload(name, args)?),
            "undoTravel" => UndoTravel(payload(name, args)?),
            "cancelNotifications" => CancelNotifications(payload(name, args)?),
            "finalScore" => FinalScore(payload(name, args)?),
            _ => return Err(UiError::UnknownNotification(name.to_string())),
        };
        Ok(event)
    }

    pub fn name(&self) -> &'static str {
        use NotificationEvent::*;
        match self {
            Travel(_) => "travel",
            Double(_) => "double",
            Move(_) => "move",
            UndoMove(_) => "undoMove",
            Camp(_) => "camp",
            UndoCamp(_) => "undoCamp",
            Souvenir(_) => "souvenir",
            UndoSouvenir(_) => "undoSouvenir",
            Stamp(_) => "stamp",
            UndoStamp(_) => "undoStamp",
            Postcard(_) => "postcard",
            RefillPostcards(_) => "refillPostcards",
            DiscardPostcards(_) => "discardPostcards",
            Guide(_) => "guide",
            GuideChoose(_) => "guideChoose",
            Send(_) => "send",
            UndoSend(_) => "undoSend",
            Gift(_) => "gift",
            RefillGift(_) => "refillGift",
            PlayGift(_) => "playGift",
            DiscardGift(_) => "discardGift",
            DrawTravel(_) => "drawTravel",
            DrawTravelPublic(_) => "drawTravelPublic",
            RefillTravel(_) => "refillTravel",
            ReshuffleTravel(_) => "reshuffleTravel",
            Bonus(_) => "bonus",
            Star(_) => "star",
            Score(_) => "score",
            NewTurn(_) => "newTurn",
            UndoTravel(_) => "undoTravel",
            CancelNotifications(_) => "cancelNotifications",
            FinalScore(_) => "finalScore",
        }
    }

    /// Player the notification is about, if any
    pub fn player(&self) -> Option<PlayerId> {
        use NotificationEvent::*;
        match self {
            Travel(p) | UndoTravel(p) => Some(p.player_id),
            Double(p) => Some(p.player_id),
            Move(p) | UndoMove(p) => Some(p.player_id),
            Camp(p) | UndoCamp(p) => Some(p.player_id),
            Souvenir(p) | UndoSouvenir(p) => Some(p.player_id),
            Stamp(p) | UndoStamp(p) => Some(p.player_id),
            Postcard(p) | Gift(p) | DrawTravel(p) => Some(p.player_id),
            DrawTravelPublic(p) => Some(p.player_id),
            DiscardPostcards(p) | NewTurn(p) => Some(p.player_id),
            Guide(p) => Some(p.player_id),
            GuideChoose(p) => Some(p.player_id),
            Send(p) | UndoSend(p) => Some(p.player_id),
            PlayGift(p) | DiscardGift(p) => Some(p.player_id),
            Bonus(p) => Some(p.player_id),
            Star(p) => Some(p.player_id),
            Score(p) => Some(p.player_id),
            RefillPostcards(_)
            | RefillGift(_)
            | RefillTravel(_)
            | ReshuffleTravel(_)
            | CancelNotifications(_)
            | FinalScore(_) => None,
        }
    }
}

/// Notification as delivered by the host
#[derive(Debug, Clone, Deserialize)]
struct RawNotification {
    #[serde(default)]
    uid: String,
    #[serde(rename = "type")]
    name: String,
    #[serde(default)]
    log: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub uid: String,
    /// Log line shown in the game log, empty for silent notifications
    pub log: String,
    pub event: NotificationEvent,
}

impl Notification {
    pub fn new(uid: impl Into<String>, log: impl Into<String>, event: NotificationEvent) -> Self {
        Notification {
            uid: uid.into(),
            log: log.into(),
            event,
        }
    }

    pub fn from_json(value: Value) -> Result<Self> {
        let raw: RawNotification = serde_json::from_value(value)?;
        Ok(Notification {
            event: NotificationEvent::parse(&raw.name, raw.args)?,
            uid: raw.uid,
            log: raw.log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_camp() {
        let n = Notification::from_json(json!({
            "uid": "n-4",
            "type": "camp",
            "log": "Alice camps",
            "args": {"player_id": 1, "campsite": 12}
        }))
        .unwrap();
        assert_eq!(n.event.name(), "camp");
        assert_eq!(n.event.player(), Some(PlayerId::new(1)));
        assert_eq!(
            n.event,
            NotificationEvent::Camp(CampPlaced {
                player_id: PlayerId::new(1),
                campsite: 12
            })
        );
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let err = Notification::from_json(json!({"uid": "x", "type": "teleport"})).unwrap_err();
        assert!(matches!(err, UiError::UnknownNotification(name) if name == "teleport"));
    }

    #[test]
    fn test_bad_payload_names_the_notification() {
        let err = NotificationEvent::parse("move", json!({"player_id": 1})).unwrap_err();
        assert!(err.to_string().contains("move"));
    }

    #[test]
    fn test_missing_args_default() {
        let event = NotificationEvent::parse("refillGift", Value::Null).unwrap();
        assert_eq!(event, NotificationEvent::RefillGift(Refill { top: None }));
        assert_eq!(event.player(), None);
    }

    #[test]
    fn test_cancel_accepts_host_field_name() {
        let event =
            NotificationEvent::parse("cancelNotifications", json!({"notifIds": ["a", "b"]}))
                .unwrap();
        assert_eq!(
            event,
            NotificationEvent::CancelNotifications(CancelList {
                uids: vec!["a".into(), "b".into()]
            })
        );
    }

    #[test]
    fn test_final_scores_parse_player_keys() {
        let event =
            NotificationEvent::parse("finalScore", json!({"scores": {"1": 30, "2": 28}})).unwrap();
        let NotificationEvent::FinalScore(scores) = event else {
            panic!("expected finalScore");
        };
        assert_eq!(scores.scores.get(&PlayerId::new(2)), Some(&28));
    }
}
