use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::scoring::clamp_tie_break_range;
use crate::core::ScoringWeights;
use crate::models::LocationPreference;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub pairing: PairingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub path: String,
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairingSettings {
    #[serde(default)]
    pub default_location_preference: LocationPreference,
    #[serde(default = "default_respect_exclusions")]
    pub respect_exclusions: bool,
    #[serde(default = "default_tie_break_range")]
    pub tie_break_range: f64,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            default_location_preference: LocationPreference::default(),
            respect_exclusions: default_respect_exclusions(),
            tie_break_range: default_tie_break_range(),
        }
    }
}

impl PairingSettings {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            tie_break_range: clamp_tie_break_range(self.tie_break_range),
            ..ScoringWeights::default()
        }
    }
}

fn default_respect_exclusions() -> bool { true }
fn default_tie_break_range() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PAIRING_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("storage.path", "data/pairing-data.json")?
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAIRING__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PAIRING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PAIRING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply shorthand environment variables on top of the layered config
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(path) = std::env::var("PAIRING_DATA_FILE") {
        builder = builder.set_override("storage.path", path)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pairing_settings() {
        let pairing = PairingSettings::default();
        assert_eq!(pairing.default_location_preference, LocationPreference::Ignore);
        assert!(pairing.respect_exclusions);
        assert_eq!(pairing.tie_break_range, 10.0);
        assert_eq!(pairing.weights().repeat_penalty, 100.0);
    }

    #[test]
    fn test_negative_tie_break_clamped() {
        let pairing = PairingSettings {
            tie_break_range: -3.0,
            ..PairingSettings::default()
        };
        assert_eq!(pairing.weights().tie_break_range, 0.0);

        let pairing = PairingSettings {
            tie_break_range: f64::INFINITY,
            ..PairingSettings::default()
        };
        assert_eq!(pairing.weights().tie_break_range, 0.0);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_bundled_default_file_parses() {
        let text = include_str!("../config/default.toml");
        let settings: Settings = toml::from_str(text).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.pairing.default_location_preference, LocationPreference::Ignore);
        assert!(settings.pairing.respect_exclusions);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairing.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"0.0.0.0\"\nport = 9000\n\n[storage]\npath = \"x.json\"\n\n[pairing]\ndefault_location_preference = \"Different\"\ntie_break_range = 0.0\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.storage.path, "x.json");
        assert_eq!(settings.pairing.default_location_preference, LocationPreference::Different);
        assert_eq!(settings.pairing.tie_break_range, 0.0);
        assert_eq!(settings.logging.level, "info");
    }
}
