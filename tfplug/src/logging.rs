//! Logging setup for provider processes
//!
//! Terraform reads the plugin handshake from stdout, so log output always
//! goes to stderr.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Installs a global fmt subscriber writing to stderr.
/// Returns false when a subscriber was already installed.
pub fn init_logging(level: LogLevel) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level.as_tracing())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Level from `TF_LOG`, falling back to info when unset or unrecognised
pub fn level_from_env() -> LogLevel {
    std::env::var("TF_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

pub fn init_from_env() -> bool {
    init_logging(level_from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    #[serial]
    fn tf_log_selects_level() {
        std::env::set_var("TF_LOG", "trace");
        assert_eq!(level_from_env(), LogLevel::Trace);

        std::env::set_var("TF_LOG", "nonsense");
        assert_eq!(level_from_env(), LogLevel::Info);

        std::env::remove_var("TF_LOG");
        assert_eq!(level_from_env(), LogLevel::Info);
    }

    #[test]
    #[serial]
    fn second_init_is_harmless() {
        init_logging(LogLevel::Debug);
        assert!(!init_logging(LogLevel::Debug));
    }
}
