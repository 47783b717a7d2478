// Logging setup for tessella.
//
// Built on the `tracing` ecosystem. Embedders that already install their own
// subscriber can skip this module entirely; the pipeline only emits through
// the `tracing` macros and never requires a particular subscriber.

use std::sync::Once;

use tracing::{Level, Subscriber};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Configuration for the tracing subscriber this module installs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display.
    pub level: Level,
    /// Whether to emit JSON instead of a human-readable format.
    pub json_format: bool,
    /// Whether to include file and line information.
    pub show_file_line: bool,
    /// Whether to include thread name/id. Useful when watching the pool's
    /// workers interleave.
    pub show_thread_info: bool,
    /// Target filter expressions (format: "target=level,target2=level2,...").
    pub target_filters: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            show_file_line: true,
            show_thread_info: true,
            target_filters: None,
        }
    }
}

// Initialization guard so repeated calls are harmless.
static INIT: Once = Once::new();

/// Install a global subscriber with the given configuration. Safe to call
/// multiple times; only the first call takes effect.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let mut env_filter = EnvFilter::from_default_env().add_directive(config.level.into());

        if let Some(filters) = config.target_filters {
            for filter in filters.split(',') {
                if let Ok(directive) = filter.parse() {
                    env_filter = env_filter.add_directive(directive);
                }
            }
        }

        let fmt_layer = fmt::layer()
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .with_thread_names(config.show_thread_info)
            .with_thread_ids(config.show_thread_info);

        let registry = tracing_subscriber::registry().with(env_filter);

        let subscriber: Box<dyn Subscriber + Send + Sync> = if config.json_format {
            Box::new(registry.with(fmt::layer().json().flatten_event(true)))
        } else {
            Box::new(registry.with(fmt_layer))
        };

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Error setting global tracing subscriber: {}", err);
        }
    });
}

/// Reasonable defaults: INFO level, human-readable console output.
pub fn init_default() {
    init(LogConfig::default());
}

/// Development settings: DEBUG everywhere, TRACE for the actor runtime.
pub fn init_development() {
    init(LogConfig {
        level: Level::DEBUG,
        target_filters: Some("tessella=debug,tessella::actor=trace".to_string()),
        ..LogConfig::default()
    });
}

/// Test settings: warnings and errors only, compact output.
pub fn init_test() {
    init(LogConfig {
        level: Level::WARN,
        show_thread_info: false,
        ..LogConfig::default()
    });
}

// Re-export the most commonly used tracing macros for convenience.
pub use tracing::{debug, error, info, trace, warn};
