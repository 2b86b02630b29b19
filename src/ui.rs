use crate::prefs::Prompter;
use anyhow::Result;
use console::{Term, style};
use dialoguer::{Input, Password};

/// Interactive first-run prompts on the controlling terminal.
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn api_key(&mut self) -> Result<String> {
        let key = Password::new()
            .with_prompt("Enter API Key")
            .allow_empty_password(true)
            .interact_on(&self.term)?;
        Ok(key)
    }

    fn country(&mut self, default: &str) -> Result<String> {
        let country: String = Input::new()
            .with_prompt("Default country (2-letter code)")
            .default(default.to_string())
            .interact_text_on(&self.term)?;
        Ok(country)
    }

    fn notify(&mut self, message: &str) {
        let _ = self.term.write_line(&style(message).bold().to_string());
    }
}
