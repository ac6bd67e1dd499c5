//! Diagnostic logger for the UI core
//!
//! State transitions, dispatched actions, ignored clicks and played
//! notifications are reported here, tagged with a short category. Entries
//! are printed when the verbosity allows it and can additionally be kept in
//! memory so tests and replays can inspect what happened.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};

/// Verbosity level for UI diagnostics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    Silent = 0,
    /// Final scores and fatal problems
    Minimal = 1,
    /// State transitions, dispatched actions and notifications
    #[default]
    Normal = 2,
    /// Activations, animations and every ignored input
    Verbose = 3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    /// "state", "action", "notif", "click", ... or None for plain lines
    pub category: Option<&'static str>,
    pub message: String,
}

impl LogEntry {
    fn render(&self) -> String {
        match (self.level, self.category) {
            (VerbosityLevel::Minimal, _) | (_, None) => self.message.clone(),
            (_, Some(category)) => format!("  [{category}] {}", self.message),
        }
    }
}

pub struct UiLogger {
    verbosity: VerbosityLevel,
    echo: bool,
    captured: Option<RefCell<Vec<LogEntry>>>,
}

impl UiLogger {
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        UiLogger {
            verbosity,
            echo: true,
            captured: None,
        }
    }

    /// Keep every entry in memory, whatever the verbosity, without printing
    pub fn capturing() -> Self {
        UiLogger {
            verbosity: VerbosityLevel::Verbose,
            echo: false,
            captured: Some(RefCell::new(Vec::new())),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Start keeping entries in memory from now on
    pub fn start_capture(&mut self) {
        if self.captured.is_none() {
            self.captured = Some(RefCell::new(Vec::new()));
        }
    }

    /// Captured entries; empty when capture is off
    pub fn captured(&self) -> Option<Ref<'_, Vec<LogEntry>>> {
        self.captured.as_ref().map(RefCell::borrow)
    }

    /// Captured entries of one category, rendered as messages
    pub fn messages(&self, category: &str) -> Vec<String> {
        self.captured()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.category == Some(category))
                    .map(|e| e.message.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn take_captured(&mut self) -> Vec<LogEntry> {
        self.captured
            .as_mut()
            .map(|cell| std::mem::take(cell.get_mut()))
            .unwrap_or_default()
    }

    fn log(&self, level: VerbosityLevel, category: Option<&'static str>, message: &str) {
        let printed = self.echo && level <= self.verbosity;
        if !printed && self.captured.is_none() {
            return;
        }
        let entry = LogEntry {
            level,
            category,
            message: message.to_string(),
        };
        if printed {
            println!("{}", entry.render());
        }
        if let Some(captured) = &self.captured {
            captured.borrow_mut().push(entry);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    /// Categorised UI event at Normal level
    #[inline]
    pub fn event(&self, category: &'static str, message: &str) {
        self.log(VerbosityLevel::Normal, Some(category), message);
    }

    /// Categorised UI event at Verbose level
    #[inline]
    pub fn detail(&self, category: &'static str, message: &str) {
        self.log(VerbosityLevel::Verbose, Some(category), message);
    }
}

impl Default for UiLogger {
    fn default() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }
}

impl std::fmt::Debug for UiLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiLogger")
            .field("verbosity", &self.verbosity)
            .field("echo", &self.echo)
            .field("captured", &self.captured().map(|c| c.len()))
            .finish()
    }
}
