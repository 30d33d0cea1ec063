use dialoguer::{theme::ColorfulTheme, Input};
use fairdice_core::{Console, FairDiceError, Result};
use std::ops::Range;

/// Interactive console that re-prompts until the value is in range
#[derive(Default)]
pub struct TerminalConsole {
    theme: ColorfulTheme,
}

impl Console for TerminalConsole {
    fn prompt_integer(&mut self, message: &str, valid: Range<u64>) -> Result<u64> {
        Input::<u64>::with_theme(&self.theme)
            .with_prompt(message)
            .validate_with(move |value: &u64| -> std::result::Result<(), String> {
                if valid.contains(value) {
                    Ok(())
                } else {
                    Err(format!(
                        "Enter a number from {} to {}",
                        valid.start,
                        valid.end.saturating_sub(1)
                    ))
                }
            })
            .interact_text()
            .map_err(|e| FairDiceError::input_aborted(e.to_string()))
    }

    fn announce(&mut self, message: &str) {
        println!("{}", message);
    }
}
