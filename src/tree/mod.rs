//! Element tree: node arena, presentation mirror, supply rows and selectors

pub mod arena;
pub mod presentation;
pub mod selection;
pub mod supply;

pub use arena::{ElementNode, ElementTree};
pub use presentation::{Presentation, PresentationElement};
pub use selection::{Selection, SelectionEffect};
pub use supply::SupplyRow;
