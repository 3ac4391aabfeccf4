//! Tracing setup for the binary.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::{EnvFilter, Targets};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const APP_TARGET: &str = "fxconv";

fn app_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

/// Our own spans at the requested level; HTTP and storage crates only when
/// they warn.
fn app_targets(verbose: bool) -> Targets {
    let dependencies = if verbose {
        LevelFilter::WARN
    } else {
        LevelFilter::OFF
    };
    Targets::new()
        .with_target(APP_TARGET, app_level(verbose))
        .with_default(dependencies)
}

/// Installs a pretty subscriber on stderr, keeping stdout for the form.
/// `RUST_LOG` can narrow it further.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(app_level(verbose).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(app_targets(verbose))
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_verbose_enables_app_debug_only() {
        let targets = app_targets(true);
        assert!(targets.would_enable("fxconv::core::converter", &Level::DEBUG));
        assert!(!targets.would_enable("fxconv", &Level::TRACE));
        assert!(targets.would_enable("reqwest::connect", &Level::WARN));
        assert!(!targets.would_enable("hyper_util::client", &Level::DEBUG));
    }

    #[test]
    fn test_quiet_disables_everything() {
        let targets = app_targets(false);
        assert!(!targets.would_enable("fxconv", &Level::ERROR));
        assert!(!targets.would_enable("fjall", &Level::ERROR));
        assert_eq!(app_level(false), LevelFilter::OFF);
    }
}
