//! The conversion form and the events that drive it.
//!
//! Every event updates the form and yields the snapshot to convert; the form
//! itself holds no conversion logic.

/// Value the amount field takes after a reset.
pub const RESET_AMOUNT: &str = "1";

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    AmountChanged(String),
    FromChanged(String),
    ToChanged(String),
    Swap,
    Convert,
    /// Accelerator+Enter.
    ConvertShortcut,
    /// Escape.
    Reset,
}

/// What the form asks the workflow to convert.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTrigger {
    pub amount: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    From,
    To,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Amount => Field::From,
            Field::From => Field::To,
            Field::To => Field::Amount,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Field::Amount => Field::To,
            Field::From => Field::Amount,
            Field::To => Field::From,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub amount: String,
    pub from: String,
    pub to: String,
    currencies: Vec<String>,
}

impl Form {
    pub fn new(amount: &str, from: &str, to: &str, currencies: Vec<String>) -> Self {
        let mut currencies = currencies;
        for code in [from, to] {
            if !currencies.iter().any(|c| c == code) {
                currencies.push(code.to_string());
            }
        }
        Self {
            amount: amount.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            currencies,
        }
    }

    /// Applies `event` and returns the conversion it triggers.
    pub fn apply(&mut self, event: InputEvent) -> ConversionTrigger {
        match event {
            InputEvent::AmountChanged(amount) => self.amount = amount,
            InputEvent::FromChanged(code) => self.from = code,
            InputEvent::ToChanged(code) => self.to = code,
            InputEvent::Swap => std::mem::swap(&mut self.from, &mut self.to),
            InputEvent::Convert | InputEvent::ConvertShortcut => {}
            InputEvent::Reset => self.amount = RESET_AMOUNT.to_string(),
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> ConversionTrigger {
        ConversionTrigger {
            amount: self.amount.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }

    /// The code `step` positions away from `current` in the selector list.
    pub fn cycle(&self, current: &str, step: isize) -> String {
        let len = self.currencies.len() as isize;
        let index = self
            .currencies
            .iter()
            .position(|c| c == current)
            .unwrap_or(0) as isize;
        let next = (index + step).rem_euclid(len) as usize;
        self.currencies[next].clone()
    }
}
