use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Number of rotated log files kept on disk.
const MAX_LOG_FILES: usize = 5;

/// Logging configuration.
///
/// `RUST_LOG` always takes precedence over `base_level`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `"info"` or `"tessera=debug"`.
    pub base_level: String,
    /// Directory for daily-rotated log files. `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    /// File name prefix for rotated log files.
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: "info".to_string(),
            log_dir: None,
            file_prefix: "tessera".to_string(),
        }
    }
}

impl LogConfig {
    /// Console-only configuration with the given base level.
    pub fn console(base_level: &str) -> Self {
        Self {
            base_level: base_level.to_string(),
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) {
        assert!(
            !self.base_level.trim().is_empty(),
            "log base_level must not be empty"
        );
        assert!(
            !self.file_prefix.trim().is_empty(),
            "log file_prefix must not be empty"
        );
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogSetupError {
    #[error("Invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to create log directory '{path}': {source}")]
    CreateLogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create log file appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Installs the global tracing subscriber.
///
/// Console output goes to stdout, with WARN and above mirrored to stderr.
/// When `config.log_dir` is set, a non-blocking daily-rotated file layer is added.
pub fn setup_logging(config: &LogConfig) -> Result<(), LogSetupError> {
    config.validate();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.base_level).map_err(|source| {
            LogSetupError::InvalidFilter {
                directive: config.base_level.clone(),
                source,
            }
        })?,
    };

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LogSetupError::CreateLogDir {
                path: dir.clone(),
                source,
            })?;

            let file_appender = tracing_appender::rolling::Builder::new()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .max_log_files(MAX_LOG_FILES)
                .build(dir)?;

            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            LOG_GUARD
                .set(guard)
                .map_err(|_| LogSetupError::AlreadyInitialized)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LogSetupError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_console_only() {
        let config = LogConfig::default();
        assert!(config.log_dir.is_none());
        assert_eq!(config.base_level, "info");
        config.validate();
    }

    #[test]
    fn test_console_config_keeps_level() {
        let config = LogConfig::console("tessera=debug");
        assert_eq!(config.base_level, "tessera=debug");
        assert_eq!(config.file_prefix, "tessera");
    }

    #[test]
    #[should_panic(expected = "log base_level must not be empty")]
    fn test_empty_level_panics() {
        LogConfig::console("  ").validate();
    }

    #[test]
    fn test_second_setup_is_rejected() {
        let config = LogConfig::console("warn");
        // The first call may fail if another test already installed a subscriber;
        // the second call must fail either way.
        let _ = setup_logging(&config);
        assert!(matches!(
            setup_logging(&config),
            Err(LogSetupError::AlreadyInitialized)
        ));
    }
}
