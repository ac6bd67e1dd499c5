//! Postcards UI - headless presentation core for the Postcards board game
//!
//! The hosting runtime owns networking, turn order and rendering primitives.
//! This crate owns the element tree and its presentation mirror, the
//! per-state activation handlers and the notification player that replays
//! committed moves as paced animations.

/// Log at verbose level, compiled out without the `verbose-logging` feature
macro_rules! log_if_verbose {
    ($game:expr, $category:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $game.logger().detail($category, &format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$game;
        }
    };
}

pub mod core;
pub mod tree;
pub mod host;
pub mod animation;
pub mod handlers;
pub mod notifications;
pub mod game;
pub mod log_panel;
pub mod logger;
pub mod config;
pub mod script;
pub mod error;

pub use error::{Result, UiError};
pub use game::Game;
pub use host::{Host, RecordingHost};
