//! Amount validation and conversion arithmetic.

use anyhow::{Result, anyhow};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid amount";

/// A validated request, built fresh from the form on every trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    /// Validates the raw amount text and the currency codes.
    ///
    /// The amount is read from the leading number in the text, so `"12abc"`
    /// reads as 12. It must be finite and strictly greater than zero.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self> {
        let value = leading_number(amount)
            .ok_or_else(|| anyhow!("Amount is not a number: {:?}", amount))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(anyhow!("Amount must be greater than zero: {}", amount));
        }

        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Err(anyhow!("Currency codes must not be empty"));
        }

        Ok(Self {
            amount: value,
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Parses the longest numeric prefix of `text` after leading whitespace:
/// an optional sign, digits with at most one decimal point, and an optional
/// exponent. Anything after the prefix is ignored.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Multiplies `amount` by `rate` and rounds half away from zero to exactly
/// two decimal places.
///
/// Products outside the decimal range are formatted from the float product.
pub fn convert_amount(amount: f64, rate: f64) -> Result<String> {
    let exact = Decimal::from_f64(amount)
        .zip(Decimal::from_f64(rate))
        .and_then(|(amount, rate)| amount.checked_mul(rate));
    if let Some(converted) = exact {
        let converted =
            converted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        return Ok(format!("{converted:.2}"));
    }

    let product = amount * rate;
    if !product.is_finite() {
        return Err(anyhow!("Converted amount overflows: {} * {}", amount, rate));
    }
    Ok(format!("{product:.2}"))
}

/// The result of one successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted_amount: String,
    /// Raw provider rate, not rounded.
    pub rate: f64,
}

impl Conversion {
    pub fn new(request: &ConversionRequest, rate: f64) -> Result<Self> {
        Ok(Self {
            amount: request.amount,
            from: request.from.clone(),
            to: request.to.clone(),
            converted_amount: convert_amount(request.amount, rate)?,
            rate,
        })
    }

    /// "9.20 EUR"
    pub fn headline(&self) -> String {
        format!("{} {}", self.converted_amount, self.to)
    }

    /// "10 USD ="
    pub fn restated(&self) -> String {
        format!("{} {} =", self.amount, self.from)
    }

    /// "1 USD = 0.9200 EUR"
    pub fn rate_line(&self) -> String {
        format!("1 {} = {:.4} {}", self.from, self.rate, self.to)
    }
}
