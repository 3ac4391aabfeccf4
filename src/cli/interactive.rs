//! Keyboard-driven conversion form.

use super::input::{ConversionTrigger, Field, Form, InputEvent};
use super::ui;
use crate::core::converter::Converter;
use crate::core::history::HistoryStore;
use crate::core::view::Prompt;
use anyhow::{Context, Result};
use console::{Key, Term};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// What a key press asks the form loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(InputEvent),
    Focus(Field),
    ClearHistory,
    Quit,
    Ignore,
}

/// Maps a key press to a command, given the focused field and the form state.
pub fn map_key(key: &Key, focus: Field, form: &Form) -> Command {
    match key {
        Key::Char(c) if c.is_ascii_digit() || *c == '.' => {
            let mut amount = form.amount.clone();
            amount.push(*c);
            Command::Input(InputEvent::AmountChanged(amount))
        }
        Key::Backspace => {
            let mut amount = form.amount.clone();
            amount.pop();
            Command::Input(InputEvent::AmountChanged(amount))
        }
        Key::ArrowUp | Key::ArrowDown => {
            let step = if *key == Key::ArrowDown { 1 } else { -1 };
            match focus {
                Field::From => {
                    Command::Input(InputEvent::FromChanged(form.cycle(&form.from, step)))
                }
                Field::To => Command::Input(InputEvent::ToChanged(form.cycle(&form.to, step))),
                Field::Amount => Command::Ignore,
            }
        }
        Key::Tab => Command::Focus(focus.next()),
        Key::BackTab => Command::Focus(focus.previous()),
        Key::Char('s') => Command::Input(InputEvent::Swap),
        Key::Char('c') => Command::Input(InputEvent::Convert),
        Key::Enter => Command::Input(InputEvent::ConvertShortcut),
        Key::Escape => Command::Input(InputEvent::Reset),
        Key::Char('x') => Command::ClearHistory,
        Key::Char('q') | Key::CtrlC => Command::Quit,
        _ => Command::Ignore,
    }
}

/// Delays amount edits so that only the last one in a burst converts.
#[derive(Clone)]
struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Claims a slot for a new edit, superseding earlier pending edits.
    fn claim(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Waits out the delay; true when no newer edit arrived meanwhile.
    async fn settle(&self, ticket: u64) -> bool {
        tokio::time::sleep(self.delay).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }

    fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }
}

fn spawn_conversion(
    converter: &Arc<Converter>,
    trigger: ConversionTrigger,
    debounce: Option<(Debouncer, u64)>,
) {
    let converter = Arc::clone(converter);
    tokio::spawn(async move {
        if let Some((debouncer, ticket)) = debounce {
            if !debouncer.settle(ticket).await {
                debug!(ticket, "Skipping debounced edit");
                return;
            }
        }
        converter
            .convert(&trigger.amount, &trigger.from, &trigger.to)
            .await;
    });
}

/// Applies `event` to the form and schedules the conversion it triggers.
///
/// Only amount edits are debounced. Any other event cancels a pending edit so
/// the delayed edit cannot overtake a newer swap or selection.
fn dispatch(
    converter: &Arc<Converter>,
    form: &mut Form,
    debouncer: &Debouncer,
    event: InputEvent,
) {
    let debounce = match event {
        InputEvent::AmountChanged(_) if debouncer.is_enabled() => {
            Some((debouncer.clone(), debouncer.claim()))
        }
        _ => {
            debouncer.claim();
            None
        }
    };
    let trigger = form.apply(event);
    spawn_conversion(converter, trigger, debounce);
}

/// Clears the history after confirmation. Failures are logged and the form
/// keeps running.
async fn clear_history(history: &Mutex<HistoryStore>, prompt: &dyn Prompt) {
    if let Err(e) = super::history::clear(&mut *history.lock().await, prompt) {
        error!("Failed to clear history: {:#}", e);
    }
}

fn print_form(form: &Form, focus: Field) {
    let field = |name: &str, value: &str, this: Field| {
        let text = format!("{name}: {value}");
        if this == focus {
            ui::style_text(&text, ui::StyleType::Focused)
        } else {
            text
        }
    };
    println!(
        "\n{}  {}  {}",
        field("Amount", &form.amount, Field::Amount),
        field("From", &form.from, Field::From),
        field("To", &form.to, Field::To),
    );
    println!(
        "{}",
        ui::style_text(
            "[0-9 . ⌫] amount  [Tab] field  [↑↓] currency  [s] swap  [c/Enter] convert  [Esc] reset  [x] clear history  [q] quit",
            ui::StyleType::Subtle
        )
    );
}

async fn read_key(term: &Term) -> Result<Key> {
    let term = term.clone();
    tokio::task::spawn_blocking(move || term.read_key())
        .await
        .context("Key reader stopped")?
        .context("Failed to read key")
}

pub async fn run(
    converter: Arc<Converter>,
    history: Arc<Mutex<HistoryStore>>,
    prompt: &dyn Prompt,
    mut form: Form,
    debounce_ms: u64,
) -> Result<()> {
    let term = Term::stdout();
    let debouncer = Debouncer::new(debounce_ms);
    let mut focus = Field::Amount;

    history.lock().await.render();
    spawn_conversion(&converter, form.snapshot(), None);

    loop {
        print_form(&form, focus);
        let key = read_key(&term).await?;
        debug!(?key, "Key pressed");

        match map_key(&key, focus, &form) {
            Command::Input(event) => dispatch(&converter, &mut form, &debouncer, event),
            Command::Focus(field) => focus = field,
            Command::ClearHistory => clear_history(&history, prompt).await,
            Command::Quit => break,
            Command::Ignore => {}
        }
    }

    Ok(())
}
