//! Output surfaces driven by the conversion workflow and the history store.

use crate::core::conversion::Conversion;
use crate::core::history::HistoryLog;

pub const ERROR_TITLE: &str = "Error";
pub const ERROR_DETAIL: &str = "Failed to convert currency";
pub const ERROR_HINT: &str = "Please check your connection and try again";
pub const EMPTY_HISTORY: &str = "No conversion history yet";
pub const CLEAR_HISTORY_QUESTION: &str = "Are you sure you want to clear all history?";

/// Result area and history list.
pub trait View: Send + Sync {
    fn show_loading(&self);
    fn show_conversion(&self, conversion: &Conversion);
    /// Generic failure state; details go to the log, not the user.
    fn show_error(&self);
    fn show_history(&self, log: &HistoryLog);
}

/// Blocking user interactions.
pub trait Prompt: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}
