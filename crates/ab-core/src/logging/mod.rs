//! Structured logging for the engine and CLI.
//!
//! - stdout is reserved for command payloads (JSON results)
//! - stderr receives all log output, human or JSONL
//! - every CLI invocation runs inside a span carrying a `run_id`

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed (tests, embedding
/// applications); the existing one is left in place.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = build_filter(config);

    let installed = match config.format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };
    installed.is_ok()
}

/// An explicit level (`AB_LOG` or `--log-level`) always applies. Otherwise
/// `RUST_LOG` directives are used when they parse, falling back to the
/// configured default.
fn build_filter(config: &LogConfig) -> EnvFilter {
    let configured = || {
        let level = LevelFilter::from(config.level);
        EnvFilter::new(format!("ab_core={level},ab_config={level},ab_math={level}"))
    };
    if config.explicit_level {
        return configured();
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured())
}

/// Unique id for one invocation, used to correlate log lines.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_short_and_unique() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert!(a.starts_with("run-"));
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn second_init_is_harmless() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
