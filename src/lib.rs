pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::display::{AssumeYes, TerminalPrompt, TerminalView};
use crate::cli::input::Form;
use crate::core::config::AppConfig;
use crate::core::{Converter, HistoryStore, Prompt, View};
use crate::providers::exchangerate_api::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    History,
    ClearHistory {
        assume_yes: bool,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let view: Arc<dyn View> = Arc::new(TerminalView::new());
    let prompt: Arc<dyn Prompt> = match command {
        AppCommand::ClearHistory { assume_yes: true } => Arc::new(AssumeYes),
        _ => Arc::new(TerminalPrompt::new()),
    };

    let store = store::open_store(&config);
    let history = Arc::new(Mutex::new(HistoryStore::load(store, Arc::clone(&view))));
    let provider = Arc::new(ExchangeRateApiProvider::from_config(&config.provider));
    let converter = Arc::new(Converter::new(
        provider,
        Arc::clone(&history),
        Arc::clone(&view),
        Arc::clone(&prompt),
    ));

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&converter, &amount, &from, &to).await
        }
        AppCommand::History => cli::history::run(&*history.lock().await),
        AppCommand::ClearHistory { .. } => {
            cli::history::clear(&mut *history.lock().await, prompt.as_ref())
        }
        AppCommand::Interactive => {
            let form = Form::new(
                &config.defaults.amount,
                &config.defaults.from,
                &config.defaults.to,
                config.currencies.clone(),
            );
            cli::interactive::run(
                converter,
                history,
                prompt.as_ref(),
                form,
                config.debounce_ms,
            )
            .await
        }
    }
}
