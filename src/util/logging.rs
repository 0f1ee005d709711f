//! Structured logging setup
//!
//! Logs go to stderr so a report written to stdout stays clean. `RUST_LOG`
//! takes precedence over the configured level when it is set.
//!
//! # Example
//!
//! ```no_run
//! use confreport::util::logging;
//!
//! logging::init_from_env();
//!
//! tracing::info!(job = "invoice batch", "Scoring evidence tree");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    /// JSON lines instead of pretty console output
    pub use_json: bool,
    pub include_target: bool,
    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `CONFREPORT_LOG_LEVEL` and `CONFREPORT_LOG_JSON`.
    ///
    /// An unknown level falls back to INFO with a warning on stderr.
    pub fn from_env() -> Self {
        let level_str = env::var("CONFREPORT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let use_json = env::var("CONFREPORT_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level: parse_level(&level_str),
            use_json,
            ..Default::default()
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_directives(&self) -> String {
        format!(
            "confreport={},h2=warn,hyper=warn,reqwest=warn",
            self.level.as_str().to_lowercase()
        )
    }
}

/// Parses a log level, falling back to INFO on unknown input
///
/// ```
/// use confreport::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber; later calls are no-ops
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
