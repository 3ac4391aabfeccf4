//! Bounded, persisted log of past conversions.

use crate::core::conversion::Conversion;
use crate::core::store::KeyValueStore;
use crate::core::view::{CLEAR_HISTORY_QUESTION, Prompt, View};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of entries kept in the log.
pub const HISTORY_LIMIT: usize = 10;

/// Storage key holding the serialized log.
pub const HISTORY_KEY: &str = "conversionHistory";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation time in milliseconds since the epoch, unique within a log.
    pub id: i64,
    pub amount: f64,
    pub from: String,
    pub converted_amount: String,
    pub to: String,
    pub rate: f64,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(conversion: &Conversion, id: i64, timestamp: String) -> Self {
        Self {
            id,
            amount: conversion.amount,
            from: conversion.from.clone(),
            converted_amount: conversion.converted_amount.clone(),
            to: conversion.to.clone(),
            rate: conversion.rate,
            timestamp,
        }
    }
}

/// Newest-first list of entries, never longer than [`HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a stored log. Anything unreadable is treated as an empty log.
    pub fn from_json(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Vec<HistoryEntry>>(bytes) {
            Ok(mut entries) => {
                entries.truncate(HISTORY_LIMIT);
                Self { entries }
            }
            Err(e) => {
                debug!("Ignoring unreadable history record: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.entries).context("Failed to serialize history")
    }

    /// Inserts `entry` at the front, dropping the oldest entry past the limit.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// An id derived from `now_ms` that is strictly greater than the newest entry's.
    pub fn next_id(&self, now_ms: i64) -> i64 {
        match self.entries.first() {
            Some(newest) if newest.id >= now_ms => newest.id + 1,
            _ => now_ms,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owns the in-memory log and keeps the stored copy and the view in sync.
pub struct HistoryStore {
    log: HistoryLog,
    store: Arc<dyn KeyValueStore>,
    view: Arc<dyn View>,
}

impl HistoryStore {
    /// Reads the stored log once. A missing or corrupt record yields an empty log.
    pub fn load(store: Arc<dyn KeyValueStore>, view: Arc<dyn View>) -> Self {
        let log = match store.get(HISTORY_KEY) {
            Ok(Some(bytes)) => HistoryLog::from_json(&bytes),
            Ok(None) => {
                debug!("No stored history");
                HistoryLog::new()
            }
            Err(e) => {
                debug!("Failed to read stored history: {}", e);
                HistoryLog::new()
            }
        };
        debug!(entries = log.len(), "Loaded history");
        Self { log, store, view }
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    /// Builds an entry for `conversion` stamped with the current local time.
    pub fn entry_for(&self, conversion: &Conversion) -> HistoryEntry {
        let now = chrono::Local::now();
        let id = self.log.next_id(now.timestamp_millis());
        let timestamp = now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string();
        HistoryEntry::new(conversion, id, timestamp)
    }

    /// Prepends `entry`, persists the whole log and re-renders.
    ///
    /// The in-memory log and the view are updated even when persisting fails;
    /// the write error is returned to the caller.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<()> {
        self.log.push(entry);
        let persisted = self.persist();
        self.render();
        persisted
    }

    pub fn render(&self) {
        self.view.show_history(&self.log);
    }

    /// Empties the log after the user confirms. Returns whether it was cleared.
    pub fn clear(&mut self, prompt: &dyn Prompt) -> Result<bool> {
        if !prompt.confirm(CLEAR_HISTORY_QUESTION) {
            debug!("History clear cancelled");
            return Ok(false);
        }

        self.log.clear();
        let removed = self
            .store
            .remove(HISTORY_KEY)
            .context("Failed to remove stored history");
        self.render();
        removed?;
        info!("History cleared");
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        let bytes = self.log.to_json()?;
        self.store
            .put(HISTORY_KEY, &bytes)
            .context("Failed to persist history")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversion::ConversionRequest;
    use crate::store::memory::MemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct HistoryRecorder {
        renders: Mutex<Vec<usize>>,
    }

    impl View for HistoryRecorder {
        fn show_loading(&self) {}
        fn show_conversion(&self, _conversion: &Conversion) {}
        fn show_error(&self) {}
        fn show_history(&self, log: &HistoryLog) {
            self.renders.lock().unwrap().push(log.len());
        }
    }

    struct FixedAnswer(bool);

    impl Prompt for FixedAnswer {
        fn alert(&self, _message: &str) {}
        fn confirm(&self, message: &str) -> bool {
            assert_eq!(message, CLEAR_HISTORY_QUESTION);
            self.0
        }
    }

    fn entry(id: i64) -> HistoryEntry {
        let request = ConversionRequest::parse(&id.to_string(), "USD", "EUR").unwrap();
        let conversion = Conversion::new(&request, 0.5).unwrap();
        HistoryEntry::new(&conversion, id, format!("t{id}"))
    }

    #[test]
    fn test_push_keeps_ten_newest_first() {
        let mut log = HistoryLog::new();
        for id in 1..=11 {
            log.push(entry(id));
            assert!(log.len() <= HISTORY_LIMIT);
        }

        assert_eq!(log.len(), HISTORY_LIMIT);
        let ids: Vec<i64> = log.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, (2..=11).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_entry_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(entry(10)).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["amount"], 10.0);
        assert_eq!(json["from"], "USD");
        assert_eq!(json["convertedAmount"], "5.00");
        assert_eq!(json["to"], "EUR");
        assert_eq!(json["rate"], 0.5);
        assert_eq!(json["timestamp"], "t10");
    }

    #[test]
    fn test_from_json_tolerates_garbage_and_truncates() {
        assert!(HistoryLog::from_json(b"not json").is_empty());
        assert!(HistoryLog::from_json(b"{\"rates\": 1}").is_empty());

        let oversized: Vec<HistoryEntry> = (1..=15).rev().map(entry).collect();
        let bytes = serde_json::to_vec(&oversized).unwrap();
        let log = HistoryLog::from_json(&bytes);
        assert_eq!(log.len(), HISTORY_LIMIT);
        assert_eq!(log.entries()[0].id, 15);
    }

    #[test]
    fn test_next_id_is_strictly_increasing() {
        let mut log = HistoryLog::new();
        assert_eq!(log.next_id(100), 100);
        log.push(entry(100));
        assert_eq!(log.next_id(100), 101);
        assert_eq!(log.next_id(90), 101);
        assert_eq!(log.next_id(200), 200);
    }

    #[test]
    fn test_load_missing_or_corrupt_record_is_empty() {
        let view = Arc::new(HistoryRecorder::default());
        let store = Arc::new(MemoryStore::new());
        assert!(HistoryStore::load(store.clone(), view.clone()).log().is_empty());

        store.put(HISTORY_KEY, b"[{\"broken\"").unwrap();
        assert!(HistoryStore::load(store, view).log().is_empty());
    }

    #[test]
    fn test_append_persists_and_renders() {
        let view = Arc::new(HistoryRecorder::default());
        let store = Arc::new(MemoryStore::new());
        let mut history = HistoryStore::load(store.clone(), view.clone());

        history.append(entry(1)).unwrap();
        history.append(entry(2)).unwrap();

        let stored = store.get(HISTORY_KEY).unwrap().unwrap();
        let reloaded = HistoryLog::from_json(&stored);
        assert_eq!(&reloaded, history.log());
        assert_eq!(reloaded.entries()[0].id, 2);
        assert_eq!(*view.renders.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_clear_denied_leaves_everything_untouched() {
        let view = Arc::new(HistoryRecorder::default());
        let store = Arc::new(MemoryStore::new());
        let mut history = HistoryStore::load(store.clone(), view.clone());
        history.append(entry(1)).unwrap();
        let before = store.get(HISTORY_KEY).unwrap();

        assert!(!history.clear(&FixedAnswer(false)).unwrap());

        assert_eq!(history.log().len(), 1);
        assert_eq!(store.get(HISTORY_KEY).unwrap(), before);
        assert_eq!(*view.renders.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_clear_confirmed_removes_record() {
        let view = Arc::new(HistoryRecorder::default());
        let store = Arc::new(MemoryStore::new());
        let mut history = HistoryStore::load(store.clone(), view.clone());
        history.append(entry(1)).unwrap();

        assert!(history.clear(&FixedAnswer(true)).unwrap());

        assert!(history.log().is_empty());
        assert!(store.get(HISTORY_KEY).unwrap().is_none());
        assert_eq!(*view.renders.lock().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_entry_for_uses_increasing_ids() {
        let view = Arc::new(HistoryRecorder::default());
        let mut history = HistoryStore::load(Arc::new(MemoryStore::new()), view);
        let request = ConversionRequest::parse("1", "USD", "EUR").unwrap();
        let conversion = Conversion::new(&request, 0.9).unwrap();

        let first = history.entry_for(&conversion);
        history.append(first.clone()).unwrap();
        let second = history.entry_for(&conversion);

        assert!(second.id > first.id);
        assert!(!second.timestamp.is_empty());
    }
}
