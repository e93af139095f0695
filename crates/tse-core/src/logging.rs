//! Tracing subscriber setup: colored console output plus an optional
//! daily-rotating file under the configured log directory.
//!
//! `RUST_LOG` always wins over the configured level.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Effective logging settings after command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings<'a> {
    pub level: &'a str,
    pub dir: Option<&'a str>,
    /// Log file prefix; the appender adds the date.
    pub file_prefix: &'a str,
    /// Write the file layer as JSON lines.
    pub json: bool,
}

impl<'a> LogSettings<'a> {
    pub fn from_config(config: &'a LoggingConfig) -> Self {
        Self {
            level: &config.level,
            dir: config.log_path.as_deref(),
            file_prefix: &config.module_name,
            json: config.json,
        }
    }

    pub fn with_level(mut self, level: Option<&'a str>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        self
    }

    pub fn with_dir(mut self, dir: Option<&'a str>) -> Self {
        if dir.is_some() {
            self.dir = dir;
        }
        self
    }
}

/// Install the global subscriber. Call once at program start.
pub fn init_logging(settings: &LogSettings<'_>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.level));

    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    let file_layer = settings.dir.map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, format!("{}.log", settings.file_prefix));
        if settings.json {
            fmt::layer().json().with_writer(appender).boxed()
        } else {
            fmt::layer().with_writer(appender).with_ansi(false).with_target(true).boxed()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}
