//! Static game content keyed by server ids
//!
//! These tables are game material, not logic: the id to value mapping must
//! match the server's card and board data exactly.

use crate::core::NodeKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionInfo {
    pub id: u32,
    pub name: &'static str,
    pub color: &'static str,
}

pub const REGIONS: [RegionInfo; 6] = [
    RegionInfo { id: 1, name: "Iberia", color: "orange" },
    RegionInfo { id: 2, name: "France", color: "blue" },
    RegionInfo { id: 3, name: "British Isles", color: "green" },
    RegionInfo { id: 4, name: "Central Europe", color: "yellow" },
    RegionInfo { id: 5, name: "Italy", color: "red" },
    RegionInfo { id: 6, name: "Scandinavia", color: "purple" },
];

pub fn region(id: u32) -> Option<&'static RegionInfo> {
    REGIONS.iter().find(|r| r.id == id)
}

/// Campsite id -> campsite type. Campsites are numbered `region * 10 + 1..=3`.
const CAMPSITE_TYPES: [(u32, &str); 18] = [
    (11, "beach"),
    (12, "mountain"),
    (13, "city"),
    (21, "city"),
    (22, "vineyard"),
    (23, "beach"),
    (31, "castle"),
    (32, "city"),
    (33, "lake"),
    (41, "forest"),
    (42, "city"),
    (43, "mountain"),
    (51, "beach"),
    (52, "vineyard"),
    (53, "city"),
    (61, "fjord"),
    (62, "forest"),
    (63, "lake"),
];

/// Souvenir space id -> souvenir kind. Spaces are numbered `region * 10 + 4..=5`.
const SOUVENIR_KINDS: [(u32, &str); 12] = [
    (14, "port wine"),
    (15, "fan"),
    (24, "cheese"),
    (25, "perfume"),
    (34, "tea"),
    (35, "tartan"),
    (44, "cuckoo clock"),
    (45, "pretzel"),
    (54, "pasta"),
    (55, "murano glass"),
    (64, "wool sweater"),
    (65, "smoked salmon"),
];

/// Gift card id -> gift kind
const GIFT_KINDS: [(u32, &str); 12] = [
    (1, "camp"),
    (2, "camp"),
    (3, "souvenir"),
    (4, "souvenir"),
    (5, "stamp"),
    (6, "stamp"),
    (7, "move"),
    (8, "move"),
    (9, "postcard"),
    (10, "postcard"),
    (11, "star"),
    (12, "star"),
];

pub fn campsite_type(id: u32) -> Option<&'static str> {
    CAMPSITE_TYPES.iter().find(|(k, _)| *k == id).map(|(_, v)| *v)
}

pub fn souvenir_kind(space: u32) -> Option<&'static str> {
    SOUVENIR_KINDS.iter().find(|(k, _)| *k == space).map(|(_, v)| *v)
}

pub fn gift_kind(id: u32) -> Option<&'static str> {
    GIFT_KINDS.iter().find(|(k, _)| *k == id).map(|(_, v)| *v)
}

/// Region a campsite or souvenir space belongs to
pub fn space_region(space: u32) -> Option<u32> {
    let region_id = space / 10;
    region(region_id).map(|r| r.id)
}

pub fn campsites_of(region_id: u32) -> impl Iterator<Item = u32> {
    CAMPSITE_TYPES
        .iter()
        .map(|(id, _)| *id)
        .filter(move |id| id / 10 == region_id)
}

pub fn souvenir_spaces_of(region_id: u32) -> impl Iterator<Item = u32> {
    SOUVENIR_KINDS
        .iter()
        .map(|(id, _)| *id)
        .filter(move |id| id / 10 == region_id)
}

/// Action printed on a Travel card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelAction {
    Move,
    Camp,
    Souvenir,
    Stamp,
    Postcard,
    Gift,
}

impl TravelAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelAction::Move => "move",
            TravelAction::Camp => "camp",
            TravelAction::Souvenir => "souvenir",
            TravelAction::Stamp => "stamp",
            TravelAction::Postcard => "postcard",
            TravelAction::Gift => "gift",
        }
    }
}

pub fn travel_action(card: u32) -> Option<TravelAction> {
    match card {
        1..=8 => Some(TravelAction::Move),
        9..=13 => Some(TravelAction::Camp),
        14..=18 => Some(TravelAction::Souvenir),
        19..=23 => Some(TravelAction::Stamp),
        24..=27 => Some(TravelAction::Postcard),
        28..=30 => Some(TravelAction::Gift),
        _ => None,
    }
}

/// Bonus actions a player can unlock outside the three-card budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    Move,
    Souvenir,
    Stamp,
}

impl BonusKind {
    pub const ALL: [BonusKind; 3] = [BonusKind::Move, BonusKind::Souvenir, BonusKind::Stamp];

    pub fn as_str(&self) -> &'static str {
        match self {
            BonusKind::Move => "move",
            BonusKind::Souvenir => "souvenir",
            BonusKind::Stamp => "stamp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BonusKind::Move => "Bonus: Move",
            BonusKind::Souvenir => "Bonus: Souvenir",
            BonusKind::Stamp => "Bonus: Stamp",
        }
    }
}

/// Tooltip text for a card or board element
pub fn tooltip(kind: NodeKind, id: u32) -> Option<String> {
    match kind {
        NodeKind::Region => region(id).map(|r| format!("{} ({} stamps)", r.name, r.color)),
        NodeKind::Campsite => campsite_type(id).map(|t| format!("Campsite: {t}")),
        NodeKind::SouvenirSpace => souvenir_kind(id).map(|s| format!("Souvenir: {s}")),
        NodeKind::Gift => gift_kind(id).map(|g| format!("Gift card: {g}")),
        NodeKind::Travel => travel_action(id).map(|a| format!("Travel card: {}", a.as_str())),
        NodeKind::Postcard => Some(format!("Postcard #{id}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_region_has_three_campsites_and_two_spaces() {
        for r in REGIONS {
            assert_eq!(campsites_of(r.id).count(), 3, "region {}", r.name);
            assert_eq!(souvenir_spaces_of(r.id).count(), 2, "region {}", r.name);
        }
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(campsite_type(22), Some("vineyard"));
        assert_eq!(souvenir_kind(55), Some("murano glass"));
        assert_eq!(gift_kind(11), Some("star"));
        assert_eq!(travel_action(30), Some(TravelAction::Gift));
        assert_eq!(travel_action(31), None);
        assert_eq!(space_region(43), Some(4));
        assert_eq!(space_region(99), None);
    }

    #[test]
    fn test_tooltips() {
        assert_eq!(tooltip(NodeKind::Campsite, 61).as_deref(), Some("Campsite: fjord"));
        assert_eq!(tooltip(NodeKind::Counter, 1), None);
    }
}
