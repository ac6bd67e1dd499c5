//! Strongly-typed wrappers for element tree concepts
//!
//! Node kinds and attribute names are closed enums rather than strings so a
//! typo in a handler is a compile error instead of a node that silently
//! never activates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Caller-assigned key of a node, unique within its parent and kind
///
/// Server ids are mostly numeric (cards, regions, players) with a few named
/// containers ("hand", "travel"). Numbers sort before names and compare
/// numerically, which is the ordering supply rows are laid out in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildId {
    Num(u32),
    Name(String),
}

impl ChildId {
    pub fn as_num(&self) -> Option<u32> {
        match self {
            ChildId::Num(n) => Some(*n),
            ChildId::Name(_) => None,
        }
    }

    /// Parse a path segment: digits become `Num`, anything else `Name`
    pub fn parse(s: &str) -> Self {
        match s.parse::<u32>() {
            Ok(n) => ChildId::Num(n),
            Err(_) => ChildId::Name(s.to_string()),
        }
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildId::Num(n) => write!(f, "{n}"),
            ChildId::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for ChildId {
    fn from(n: u32) -> Self {
        ChildId::Num(n)
    }
}

impl From<&str> for ChildId {
    fn from(s: &str) -> Self {
        ChildId::Name(s.to_string())
    }
}

impl From<String> for ChildId {
    fn from(s: String) -> Self {
        ChildId::Name(s)
    }
}

impl From<crate::core::PlayerId> for ChildId {
    fn from(id: crate::core::PlayerId) -> Self {
        ChildId::Num(id.as_u32())
    }
}

/// The `typeName` tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Game,
    Board,
    Region,
    Campsite,
    SouvenirSpace,
    Souvenir,
    Camp,
    Pawn,
    Stamp,
    Star,
    Player,
    Hand,
    Used,
    Travel,
    Gift,
    Postcard,
    Supply,
    Counter,
    Bonus,
}

impl NodeKind {
    pub const ALL: [NodeKind; 19] = [
        NodeKind::Game,
        NodeKind::Board,
        NodeKind::Region,
        NodeKind::Campsite,
        NodeKind::SouvenirSpace,
        NodeKind::Souvenir,
        NodeKind::Camp,
        NodeKind::Pawn,
        NodeKind::Stamp,
        NodeKind::Star,
        NodeKind::Player,
        NodeKind::Hand,
        NodeKind::Used,
        NodeKind::Travel,
        NodeKind::Gift,
        NodeKind::Postcard,
        NodeKind::Supply,
        NodeKind::Counter,
        NodeKind::Bonus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Game => "game",
            NodeKind::Board => "board",
            NodeKind::Region => "region",
            NodeKind::Campsite => "campsite",
            NodeKind::SouvenirSpace => "souvenir-space",
            NodeKind::Souvenir => "souvenir",
            NodeKind::Camp => "camp",
            NodeKind::Pawn => "pawn",
            NodeKind::Stamp => "stamp",
            NodeKind::Star => "star",
            NodeKind::Player => "player",
            NodeKind::Hand => "hand",
            NodeKind::Used => "used",
            NodeKind::Travel => "travel",
            NodeKind::Gift => "gift",
            NodeKind::Postcard => "postcard",
            NodeKind::Supply => "supply",
            NodeKind::Counter => "counter",
            NodeKind::Bonus => "bonus",
        }
    }

    pub fn parse(s: &str) -> Option<NodeKind> {
        NodeKind::ALL.iter().copied().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attribute keys a node can carry
///
/// Each one is mirrored to the presentation layer as a `data-*` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attr {
    /// Clickable for the current phase
    Active,
    /// Name of the phase that activated the node
    Phase,
    Selected,
    /// Supply slot: 1 is the deck top, 2.. the row left to right
    Supply,
    /// Travel card played this turn
    Used,
    Sent,
    FaceUp,
    Color,
    Value,
    Player,
    Kind,
    Label,
    Tooltip,
    Order,
    Zoom,
    /// Player whose turn it is
    Current,
}

impl Attr {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attr::Active => "active",
            Attr::Phase => "phase",
            Attr::Selected => "selected",
            Attr::Supply => "supply",
            Attr::Used => "used",
            Attr::Sent => "sent",
            Attr::FaceUp => "face-up",
            Attr::Color => "color",
            Attr::Value => "value",
            Attr::Player => "player",
            Attr::Kind => "kind",
            Attr::Label => "label",
            Attr::Tooltip => "tooltip",
            Attr::Order => "order",
            Attr::Zoom => "zoom",
            Attr::Current => "current",
        }
    }

    /// Name of the mirrored presentation attribute
    pub fn data_name(&self) -> String {
        format!("data-{}", self.as_str())
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primitive attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ArgValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Int(n) => write!(f, "{n}"),
            ArgValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<i32> for ArgValue {
    fn from(n: i32) -> Self {
        ArgValue::Int(n as i64)
    }
}

impl From<u32> for ArgValue {
    fn from(n: u32) -> Self {
        ArgValue::Int(n as i64)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

/// Ordered attribute bag of a node
pub type Args = BTreeMap<Attr, ArgValue>;

/// Build an [`Args`] bag from `Attr => value` pairs
#[macro_export]
macro_rules! node_args {
    () => {
        $crate::core::Args::new()
    };
    ($($attr:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::core::Args::new();
        $( args.insert($attr, $crate::core::ArgValue::from($value)); )+
        args
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_id_ordering() {
        let mut ids = vec![
            ChildId::from("hand"),
            ChildId::from(10),
            ChildId::from(9),
            ChildId::from("deck"),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                ChildId::Num(9),
                ChildId::Num(10),
                ChildId::from("deck"),
                ChildId::from("hand"),
            ]
        );
    }

    #[test]
    fn test_child_id_parse() {
        assert_eq!(ChildId::parse("12"), ChildId::Num(12));
        assert_eq!(ChildId::parse("hand"), ChildId::from("hand"));
    }

    #[test]
    fn test_node_kind_round_trip_names() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::parse("meeple"), None);
    }

    #[test]
    fn test_node_args_macro() {
        let args = crate::node_args![Attr::Supply => 1u32, Attr::Color => "red", Attr::Used => true];
        assert_eq!(args.get(&Attr::Supply), Some(&ArgValue::Int(1)));
        assert_eq!(args.get(&Attr::Color).and_then(|v| v.as_str()), Some("red"));
        assert_eq!(args.get(&Attr::Used).and_then(|v| v.as_bool()), Some(true));
    }
}
