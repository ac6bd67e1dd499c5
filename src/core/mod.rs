//! Core ids, node vocabulary and game content

pub mod content;
pub mod entity;
pub mod types;

pub use content::{BonusKind, TravelAction};
pub use entity::{NodeId, PlayerId};
pub use types::{ArgValue, Args, Attr, ChildId, NodeKind};
