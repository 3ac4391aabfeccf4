//! Terminal implementations of the view and prompt surfaces.

use super::ui;
use crate::core::conversion::Conversion;
use crate::core::history::HistoryLog;
use crate::core::view::{ERROR_DETAIL, ERROR_HINT, ERROR_TITLE, Prompt, View};
use console::Term;
use indicatif::ProgressBar;
use std::sync::Mutex;

/// Prints results to stdout, with a spinner while a conversion is loading.
#[derive(Default)]
pub struct TerminalView {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    fn stop_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl View for TerminalView {
    fn show_loading(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(previous) = spinner.replace(ui::new_spinner("Loading...")) {
                previous.finish_and_clear();
            }
        }
    }

    fn show_conversion(&self, conversion: &Conversion) {
        self.stop_spinner();
        println!(
            "{} {}",
            conversion.restated(),
            ui::style_text(&conversion.headline(), ui::StyleType::Result)
        );
        println!(
            "{}",
            ui::style_text(&conversion.rate_line(), ui::StyleType::Subtle)
        );
    }

    fn show_error(&self) {
        self.stop_spinner();
        println!("{}", ui::style_text(ERROR_TITLE, ui::StyleType::Error));
        println!("{ERROR_DETAIL}");
        println!("{}", ui::style_text(ERROR_HINT, ui::StyleType::Subtle));
    }

    fn show_history(&self, log: &HistoryLog) {
        println!("\n{}", log.display_as_table());
    }
}

/// Alerts on stderr and reads a single y/n key for confirmations.
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn alert(&self, message: &str) {
        let _ = self
            .term
            .write_line(&ui::style_text(message, ui::StyleType::Error));
    }

    fn confirm(&self, message: &str) -> bool {
        if self.term.write_str(&format!("{message} [y/N] ")).is_err() {
            return false;
        }
        let answer = self.term.read_char().unwrap_or('n');
        let _ = self.term.write_line("");
        matches!(answer, 'y' | 'Y')
    }
}

/// Answers every confirmation with yes, for `--yes` style flags.
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm(&self, _message: &str) -> bool {
        true
    }
}
