//! Service configuration from environment variables.
//!
//! Every knob has a documented default; a non-numeric value where a number
//! is expected is a startup-fatal configuration error, surfaced before any
//! transport connection is attempted.

use std::time::Duration;

/// Environment variable names and their defaults.
const ENV_BROKER_ADDRS: &str = "TICKFLOW_BROKER_ADDRS";
const ENV_TOPIC: &str = "TICKFLOW_TOPIC";
const ENV_GROUP_ID: &str = "TICKFLOW_GROUP_ID";
const ENV_PRODUCER_INTERVAL: &str = "TICKFLOW_PRODUCER_INTERVAL";
const ENV_STATS_INTERVAL: &str = "TICKFLOW_STATS_INTERVAL";
const ENV_LOG_LEVEL: &str = "TICKFLOW_LOG_LEVEL";

const DEFAULT_BROKER_ADDRS: &str = "localhost:9092";
const DEFAULT_TOPIC: &str = "stock_ticks";
const DEFAULT_GROUP_ID: &str = "stock_tick_consumers";
const DEFAULT_PRODUCER_INTERVAL_SECS: f64 = 1.5;
const DEFAULT_STATS_INTERVAL_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// Broker address list
    pub broker_addrs: String,
    /// Topic carrying the tick records
    pub topic: String,
    /// Consumer group identifier
    pub group_id: String,
    /// Delay between published ticks (fractional seconds supported)
    pub producer_interval: Duration,
    /// Statistics snapshot window
    pub stats_interval: Duration,
    /// Log verbosity, fed into the tracing filter
    pub log_level: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            broker_addrs: DEFAULT_BROKER_ADDRS.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            group_id: DEFAULT_GROUP_ID.to_string(),
            producer_interval: Duration::from_secs_f64(DEFAULT_PRODUCER_INTERVAL_SECS),
            stats_interval: Duration::from_secs(DEFAULT_STATS_INTERVAL_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl StreamConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(addrs) = std::env::var(ENV_BROKER_ADDRS) {
            config.broker_addrs = addrs;
        }
        if let Ok(topic) = std::env::var(ENV_TOPIC) {
            config.topic = topic;
        }
        if let Ok(group_id) = std::env::var(ENV_GROUP_ID) {
            config.group_id = group_id;
        }
        if let Ok(raw) = std::env::var(ENV_PRODUCER_INTERVAL) {
            let secs: f64 = raw.parse().map_err(|_| {
                ConfigError::parse(ENV_PRODUCER_INTERVAL, &raw, "fractional seconds")
            })?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::parse(
                    ENV_PRODUCER_INTERVAL,
                    &raw,
                    "positive fractional seconds",
                ));
            }
            config.producer_interval = Duration::from_secs_f64(secs);
        }
        if let Ok(raw) = std::env::var(ENV_STATS_INTERVAL) {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ConfigError::parse(ENV_STATS_INTERVAL, &raw, "whole seconds"))?;
            config.stats_interval = Duration::from_secs(secs);
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            config.log_level = level.to_lowercase();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration, collecting every violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.broker_addrs.trim().is_empty() {
            errors.push("broker_addrs cannot be empty".to_string());
        }
        if self.topic.trim().is_empty() {
            errors.push("topic cannot be empty".to_string());
        }
        if self.group_id.trim().is_empty() {
            errors.push("group_id cannot be empty".to_string());
        }
        if self.stats_interval < Duration::from_secs(1) {
            errors.push("stats_interval must be at least 1 second".to_string());
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "invalid log_level '{}', valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Configuration error type.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A variable held text that does not parse as the expected number
    #[error("invalid value '{value}' for {var}: expected {expected}")]
    Parse {
        /// Environment variable name
        var: String,
        /// Offending value
        value: String,
        /// What the variable expects
        expected: String,
    },

    /// One or more settings failed validation
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ConfigError {
    fn parse(var: &str, value: &str, expected: &str) -> Self {
        Self::Parse {
            var: var.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env mutation is process-global; serialise the tests that touch it.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.broker_addrs, "localhost:9092");
        assert_eq!(config.topic, "stock_ticks");
        assert_eq!(config.group_id, "stock_tick_consumers");
        assert_eq!(config.producer_interval, Duration::from_millis(1_500));
        assert_eq!(config.stats_interval, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override_numeric() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_PRODUCER_INTERVAL, "0.25");
        let config = StreamConfig::from_env().unwrap();
        assert_eq!(config.producer_interval, Duration::from_millis(250));
        std::env::remove_var(ENV_PRODUCER_INTERVAL);
    }

    #[test]
    fn test_non_numeric_interval_is_fatal() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_STATS_INTERVAL, "soon");
        let err = StreamConfig::from_env().unwrap_err();
        std::env::remove_var(ENV_STATS_INTERVAL);
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let config = StreamConfig {
            broker_addrs: " ".to_string(),
            topic: String::new(),
            log_level: "loud".to_string(),
            ..StreamConfig::default()
        };

        match config.validate().unwrap_err() {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_producer_interval_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_PRODUCER_INTERVAL, "-1.0");
        let err = StreamConfig::from_env().unwrap_err();
        std::env::remove_var(ENV_PRODUCER_INTERVAL);
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
