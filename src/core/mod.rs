//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod converter;
pub mod history;
pub mod log;
pub mod rate;
pub mod store;
pub mod view;

// Re-export main types for cleaner imports
pub use conversion::{Conversion, ConversionRequest};
pub use converter::{ConversionOutcome, Converter};
pub use history::{HistoryEntry, HistoryLog, HistoryStore};
pub use rate::{RateProvider, RateQuote};
pub use store::KeyValueStore;
pub use view::{Prompt, View};
