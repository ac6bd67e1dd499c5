//! Server-declared game states

use crate::UiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eleven states the server can put the table in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateName {
    Action,
    Camp,
    Confirm,
    Gift,
    Guide,
    Move,
    Postcard,
    Souvenir,
    Stamp,
    Star,
    Travel,
}

impl StateName {
    pub const ALL: [StateName; 11] = [
        StateName::Action,
        StateName::Camp,
        StateName::Confirm,
        StateName::Gift,
        StateName::Guide,
        StateName::Move,
        StateName::Postcard,
        StateName::Souvenir,
        StateName::Stamp,
        StateName::Star,
        StateName::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateName::Action => "action",
            StateName::Camp => "camp",
            StateName::Confirm => "confirm",
            StateName::Gift => "gift",
            StateName::Guide => "guide",
            StateName::Move => "move",
            StateName::Postcard => "postcard",
            StateName::Souvenir => "souvenir",
            StateName::Stamp => "stamp",
            StateName::Star => "star",
            StateName::Travel => "travel",
        }
    }

    /// Parse a server state name, ignoring case
    pub fn parse(name: &str) -> Option<StateName> {
        StateName::ALL
            .iter()
            .copied()
            .find(|state| state.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StateName {
    type Err = UiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateName::parse(s).ok_or_else(|| UiError::UnknownState(s.to_string()))
    }
}
