use crate::core::converter::{ConversionOutcome, Converter};
use anyhow::Result;
use tracing::debug;

/// Runs a single conversion. Failures are shown by the view, not returned.
pub async fn run(converter: &Converter, amount: &str, from: &str, to: &str) -> Result<()> {
    let outcome = converter.convert(amount, from, to).await;
    debug!(?outcome, "Conversion finished");
    if let ConversionOutcome::Converted(entry) = outcome {
        debug!(id = entry.id, "Recorded conversion");
    }
    Ok(())
}
