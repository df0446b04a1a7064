/// Unified logger for centralized logging configuration

use std::path::PathBuf;
use std::sync::Mutex;
use telescope_core::{Result, SystemError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Also write logs to `log_file_path`
    pub log_to_file: bool,

    /// Log file path
    pub log_file_path: Option<PathBuf>,

    /// Include thread IDs
    pub include_thread_ids: bool,

    /// Include target module paths
    pub include_targets: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file_path: None,
            include_thread_ids: false,
            include_targets: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }
}

/// Unified logger
pub struct UnifiedLogger;

impl UnifiedLogger {
    /// Install the global subscriber.
    ///
    /// `RUST_LOG` takes precedence over `config.level`. Returns `Ok(false)`
    /// when another subscriber was installed first.
    pub fn init(config: LoggerConfig) -> Result<bool> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .map_err(|e| SystemError::Configuration {
                details: format!("invalid log level {:?}: {}", config.level, e),
            })?;

        let console_layer = fmt::layer()
            .with_target(config.include_targets)
            .with_thread_ids(config.include_thread_ids)
            .with_ansi(true);

        let file_layer = match (config.log_to_file, &config.log_file_path) {
            (true, Some(path)) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(SystemError::from)?;
                }
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(SystemError::from)?;
                Some(
                    fmt::layer()
                        .with_target(config.include_targets)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
            }
            (true, None) => {
                return Err(SystemError::Configuration {
                    details: "log_to_file is set without log_file_path".to_string(),
                }
                .into())
            }
            (false, _) => None,
        };

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_ok();

        if installed {
            tracing::info!("Logging initialized with level: {}", config.level);
        }
        Ok(installed)
    }

    /// Initialize with default configuration
    pub fn init_default() -> Result<bool> {
        Self::init(LoggerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_config_default() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.log_to_file);
    }

    #[test]
    fn test_file_logging_requires_path() {
        let config = LoggerConfig {
            log_to_file: true,
            ..Default::default()
        };
        assert!(UnifiedLogger::init(config).is_err());
    }

    #[test]
    fn test_second_init_is_not_an_error() {
        let _ = UnifiedLogger::init(LoggerConfig::with_level("debug"));
        assert!(!UnifiedLogger::init_default().unwrap());
    }
}
