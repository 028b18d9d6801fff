//! Service configuration loaded from TOML.
//!
//! ```toml
//! [thresholds]
//! unsafe_rain_mm = 10.0
//! risky_rain_prob_pct = 40
//!
//! [weights]
//! storm = [0.0, 0.25, 0.5, 1.0]
//!
//! [service]
//! alternate_count = 3
//! ```
//!
//! Every key is optional; missing keys take the built-in defaults. The
//! severity profile is validated before the config is handed out.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::profile::{ProfileError, SeverityProfile, SeverityThresholds, SeverityWeights};

/// Environment variable naming the config file path.
pub const CONFIG_PATH_ENV: &str = "EVENTGUARD_CONFIG";

/// Config file used when `EVENTGUARD_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./eventguard.toml";

/// Longest forecast horizon Open-Meteo serves, in days.
pub const MAX_HORIZON_DAYS_LIMIT: i64 = 16;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Settings for the assessment service around the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL of the Open-Meteo forecast endpoint.
    pub open_meteo_url: String,
    pub request_timeout_secs: u64,
    /// How far ahead (in days) an event may end.
    pub max_horizon_days: i64,
    /// Number of alternate windows to propose.
    pub alternate_count: usize,
    /// Address the HTTP API binds to.
    pub listen_addr: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            open_meteo_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            request_timeout_secs: 60,
            max_horizon_days: 6,
            alternate_count: 3,
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub thresholds: SeverityThresholds,
    pub weights: SeverityWeights,
    pub service: ServiceSettings,
}

impl AppConfig {
    pub fn profile(&self) -> SeverityProfile {
        SeverityProfile {
            thresholds: self.thresholds,
            weights: self.weights,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid severity profile: {0}")]
    InvalidProfile(#[from] ProfileError),
    #[error("invalid service settings: {0}")]
    InvalidService(String),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses and validates a config from TOML text.
pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(text)?;
    config.profile().validate()?;
    let horizon = config.service.max_horizon_days;
    if horizon <= 0 || horizon > MAX_HORIZON_DAYS_LIMIT {
        return Err(ConfigError::InvalidService(format!(
            "max_horizon_days must be in 1..={}, got {}",
            MAX_HORIZON_DAYS_LIMIT, horizon
        )));
    }
    if config.service.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidService(
            "request_timeout_secs must be positive".to_string(),
        ));
    }
    Ok(config)
}

/// Loads a config file from disk.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text)
}

/// Loads the config named by `EVENTGUARD_CONFIG`, falling back to
/// `./eventguard.toml`, and to built-in defaults when neither file exists.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).ok();
    match path {
        Some(p) => load_config(p),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => Ok(AppConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").expect("empty config should parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.profile(), SeverityProfile::default());
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = parse_config(
            r#"
            [thresholds]
            unsafe_rain_mm = 8.0

            [service]
            alternate_count = 5
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.thresholds.unsafe_rain_mm, 8.0);
        assert_eq!(config.thresholds.unsafe_wind_kmh, 40.0);
        assert_eq!(config.weights, SeverityWeights::default());
        assert_eq!(config.service.alternate_count, 5);
        assert_eq!(config.service.max_horizon_days, 6);
    }

    #[test]
    fn test_storm_weights_parse_as_array() {
        let config = parse_config("[weights]\nstorm = [0.0, 0.3, 0.6, 0.9]\n")
            .expect("storm weights should parse");
        assert_eq!(config.weights.storm, [0.0, 0.3, 0.6, 0.9]);
    }

    #[test]
    fn test_invalid_profile_is_rejected() {
        let err = parse_config("[thresholds]\nunsafe_wind_kmh = 0.0\n")
            .expect_err("zero divisor should be rejected");
        assert!(matches!(err, ConfigError::InvalidProfile(_)), "got {err:?}");
    }

    #[test]
    fn test_wrong_storm_weight_count_is_a_parse_error() {
        let err = parse_config("[weights]\nstorm = [0.0, 1.0]\n")
            .expect_err("two storm weights should not parse");
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_non_positive_horizon_is_rejected() {
        let err = parse_config("[service]\nmax_horizon_days = 0\n")
            .expect_err("zero horizon should be rejected");
        assert!(matches!(err, ConfigError::InvalidService(_)), "got {err:?}");
    }

    #[test]
    fn test_horizon_beyond_provider_limit_is_rejected() {
        let err = parse_config("[service]\nmax_horizon_days = 9223372036854775807\n")
            .expect_err("huge horizon should be rejected");
        assert!(matches!(err, ConfigError::InvalidService(_)), "got {err:?}");

        let config = parse_config("[service]\nmax_horizon_days = 16\n")
            .expect("provider limit itself is allowed");
        assert_eq!(config.service.max_horizon_days, MAX_HORIZON_DAYS_LIMIT);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config("./does-not-exist/eventguard.toml").expect_err("should fail");
        assert!(err.to_string().contains("does-not-exist"), "got '{err}'");
    }

    #[test]
    fn test_bundled_config_file_is_valid() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/eventguard.toml"))
            .expect("bundled eventguard.toml should load");
        assert_eq!(config.profile(), SeverityProfile::default());
    }
}
