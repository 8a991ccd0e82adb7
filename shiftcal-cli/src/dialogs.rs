use dialoguer::Confirm;
use owo_colors::OwoColorize;
use shiftcal_core::Dialogs;

/// Confirmations on the terminal. With `assume_yes` every question is
/// answered yes without prompting.
pub struct TerminalDialogs {
    assume_yes: bool,
}

impl TerminalDialogs {
    pub fn new(assume_yes: bool) -> Self {
        TerminalDialogs { assume_yes }
    }
}

impl Dialogs for TerminalDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        println!("{}", message.yellow());
    }
}
