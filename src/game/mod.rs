//! Game aggregate: the tree, the host, and the per-state bookkeeping

pub mod phase;
pub mod setup;
pub mod state;
pub mod zoom;

pub use phase::StateName;
pub use setup::{GameSetup, Layout, PlayerSetup, PostcardSetup, SupplySetup};
pub use state::{Game, StatusButton};
pub use zoom::Zoom;
