//! Exchange rate abstractions

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;

/// Rates for one base currency, as returned by a single provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl RateQuote {
    /// Looks up the rate for `to`. Unknown codes and non-positive rates are
    /// both reported as an invalid currency.
    pub fn rate_for(&self, to: &str) -> Result<f64> {
        match self.rates.get(to) {
            Some(rate) if rate.is_finite() && *rate > 0.0 => Ok(*rate),
            _ => Err(anyhow!("Invalid currency code: {}", to)),
        }
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, from: &str) -> Result<RateQuote>;
}
