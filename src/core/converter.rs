//! The conversion workflow: validate, fetch, compute, then update the view
//! and the history.

use crate::core::conversion::{Conversion, ConversionRequest, INVALID_AMOUNT_MESSAGE};
use crate::core::history::{HistoryEntry, HistoryStore};
use crate::core::rate::RateProvider;
use crate::core::view::{Prompt, View};
use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

/// What a single `convert` call ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    /// Shown and recorded.
    Converted(HistoryEntry),
    /// Input failed validation; nothing was fetched.
    Rejected,
    /// Fetch or lookup failed; the view shows the error state.
    Failed,
    /// A newer conversion started while this one was in flight.
    Superseded,
}

pub struct Converter {
    provider: Arc<dyn RateProvider>,
    history: Arc<Mutex<HistoryStore>>,
    view: Arc<dyn View>,
    prompt: Arc<dyn Prompt>,
    generation: AtomicU64,
}

impl Converter {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        history: Arc<Mutex<HistoryStore>>,
        view: Arc<dyn View>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            provider,
            history,
            view,
            prompt,
            generation: AtomicU64::new(0),
        }
    }

    /// Converts `amount` from one currency to another.
    ///
    /// Errors never escape: invalid input raises an alert, fetch failures put
    /// the view in its error state. Only the most recently started call may
    /// update the view or the history.
    #[instrument(name = "Convert", skip(self), fields(amount = %amount, from = %from, to = %to))]
    pub async fn convert(&self, amount: &str, from: &str, to: &str) -> ConversionOutcome {
        let request = match ConversionRequest::parse(amount, from, to) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected input: {}", e);
                self.prompt.alert(INVALID_AMOUNT_MESSAGE);
                return ConversionOutcome::Rejected;
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.show_loading();

        let result = self.fetch_conversion(&request).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale response");
            return ConversionOutcome::Superseded;
        }

        match result {
            Ok(conversion) => {
                self.view.show_conversion(&conversion);
                let mut history = self.history.lock().await;
                let entry = history.entry_for(&conversion);
                if let Err(e) = history.append(entry.clone()) {
                    warn!("Conversion shown but history was not saved: {:#}", e);
                }
                ConversionOutcome::Converted(entry)
            }
            Err(e) => {
                error!("Error converting currency: {:#}", e);
                self.view.show_error();
                ConversionOutcome::Failed
            }
        }
    }

    async fn fetch_conversion(&self, request: &ConversionRequest) -> Result<Conversion> {
        let quote = self.provider.fetch_rates(&request.from).await?;
        let rate = quote.rate_for(&request.to)?;
        debug!(rate, "Received rate");
        Conversion::new(request, rate)
    }
}
