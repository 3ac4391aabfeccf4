use super::ui;
use crate::core::history::{HistoryLog, HistoryStore};
use crate::core::view::{EMPTY_HISTORY, Prompt};
use anyhow::Result;
use comfy_table::Cell;

impl HistoryLog {
    /// Renders the log newest first, or a placeholder row when it is empty.
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Conversion"), ui::header_cell("When")]);

        if self.is_empty() {
            table.add_row(vec![Cell::new(EMPTY_HISTORY)]);
        }

        for entry in self.entries() {
            table.add_row(vec![
                Cell::new(format!(
                    "{} {} → {} {}",
                    entry.amount, entry.from, entry.converted_amount, entry.to
                )),
                ui::subtle_cell(&entry.timestamp),
            ]);
        }

        format!(
            "{}\n\n{}",
            ui::style_text("History", ui::StyleType::Title),
            table
        )
    }
}

pub fn run(history: &HistoryStore) -> Result<()> {
    history.render();
    Ok(())
}

pub fn clear(history: &mut HistoryStore, prompt: &dyn Prompt) -> Result<()> {
    if !history.clear(prompt)? {
        println!("History kept.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversion::{Conversion, ConversionRequest};
    use crate::core::history::HistoryEntry;

    fn entry(amount: &str, from: &str, to: &str, rate: f64, id: i64) -> HistoryEntry {
        let request = ConversionRequest::parse(amount, from, to).unwrap();
        let conversion = Conversion::new(&request, rate).unwrap();
        HistoryEntry::new(&conversion, id, format!("10/19/2026, 9:0{id}:00 AM"))
    }

    #[test]
    fn test_empty_history_shows_placeholder() {
        let output = HistoryLog::new().display_as_table();
        assert!(output.contains(EMPTY_HISTORY));
    }

    #[test]
    fn test_rows_are_newest_first() {
        let mut log = HistoryLog::new();
        log.push(entry("10", "USD", "EUR", 0.92, 1));
        log.push(entry("2.5", "GBP", "INR", 105.0, 2));

        let output = log.display_as_table();

        assert!(!output.contains(EMPTY_HISTORY));
        let newest = output.find("2.5 GBP → 262.50 INR").unwrap();
        let oldest = output.find("10 USD → 9.20 EUR").unwrap();
        assert!(newest < oldest);
        assert!(output.contains("10/19/2026, 9:01:00 AM"));
    }
}
