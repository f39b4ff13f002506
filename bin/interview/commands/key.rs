//! Key command - manage the cached Gemini API key

use super::{Context, KeyAction};
use crate::style::*;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Password};
use interview_assistant::credentials::mask;
use interview_assistant::validation::check_api_key;

pub fn run(ctx: &Context, action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Set { value } => {
            let value = match value {
                Some(value) => value,
                None => Password::with_theme(&ColorfulTheme::default())
                    .with_prompt("  Gemini API key")
                    .interact()?,
            };

            if let Some(violation) = check_api_key(&value) {
                print_warning(&violation.message);
            }

            ctx.credentials.remember(&value)?;
            if value.trim().is_empty() {
                print_info("Empty key, cached key cleared");
            } else {
                print_success(&format!(
                    "API key saved to {}",
                    ctx.credentials.path().display()
                ));
            }
        }
        KeyAction::Clear => {
            ctx.credentials.clear()?;
            print_success("Cached API key cleared");
        }
        KeyAction::Show => match ctx.credentials.load()? {
            Some(key) => print_key_value("API key", &mask(&key)),
            None => print_info("No API key cached"),
        },
    }
    Ok(())
}
