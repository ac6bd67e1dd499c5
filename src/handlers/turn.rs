//! End-of-turn states: Star and Confirm

use super::PhaseHandler;
use crate::core::content;
use crate::game::{Game, StateName};
use crate::host::{ButtonAction, Host, PreferenceKey};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarArgs {
    /// Region the star is scored in
    #[serde(default)]
    pub region: Option<u32>,
}

/// Star scoring: a shared title, nothing to click
pub struct StarHandler;

impl PhaseHandler for StarHandler {
    const STATE: StateName = StateName::Star;
    type Args = StarArgs;

    fn enter<H: Host>(game: &mut Game<H>, args: StarArgs, active: bool) -> Result<()> {
        let phrase = match args.region.and_then(content::region) {
            Some(region) => format!("must place a Star in {}", region.name),
            None => "must place a Star".to_string(),
        };
        game.set_phase_title(active, &phrase);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmArgs {}

/// Turn confirmation, optionally fired automatically after a pause
pub struct ConfirmHandler;

impl PhaseHandler for ConfirmHandler {
    const STATE: StateName = StateName::Confirm;
    type Args = ConfirmArgs;

    fn enter<H: Host>(game: &mut Game<H>, _args: ConfirmArgs, active: bool) -> Result<()> {
        game.set_phase_title(active, "must confirm the turn");
        if !active {
            return Ok(());
        }
        game.add_button(ButtonAction::Confirm)?;
        game.add_button(ButtonAction::Undo)?;
        game.add_button(ButtonAction::Reset)?;
        if game.host().preference(PreferenceKey::AutoConfirm) == Some(1) {
            game.schedule_auto_confirm()?;
        }
        Ok(())
    }

    fn button<H: Host>(game: &mut Game<H>, action: ButtonAction) -> Result<bool> {
        match action {
            ButtonAction::Confirm => {
                game.cancel_auto_confirm();
                game.commit("confirm", json!({}))?;
            }
            ButtonAction::LetMeThink => game.cancel_auto_confirm(),
            ButtonAction::Undo => {
                game.cancel_auto_confirm();
                game.commit("undo", json!({}))?;
            }
            ButtonAction::Reset => {
                game.cancel_auto_confirm();
                game.commit("reset", json!({}))?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
