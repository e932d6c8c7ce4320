//! Server configuration read from the environment

use std::env;

use anyhow::{Context, Result};
use tracing::info;

use mediqr_domain::services::patient::DEFAULT_QR_BASE_URL;

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on (`PORT`)
    pub port: u16,

    /// Directory for the SQLite file when `DB_SQLITE_PATH` is unset (`DATA_DIR`)
    pub data_dir: String,

    /// Base URL encoded in patient QR codes (`PUBLIC_BASE_URL`)
    pub public_base_url: String,

    /// Start an empty store with the demo patients (`SEED_DEMO_PATIENTS`)
    pub seed_demo_patients: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: "data".to_string(),
            public_base_url: DEFAULT_QR_BASE_URL.to_string(),
            seed_demo_patients: true,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", value))?,
            Err(_) => defaults.port,
        };

        let seed_demo_patients = match env::var("SEED_DEMO_PATIENTS") {
            Ok(value) => parse_flag(&value).with_context(|| format!("SEED_DEMO_PATIENTS must be true or false, got '{}'", value))?,
            Err(_) => defaults.seed_demo_patients,
        };

        let config = Self {
            port,
            data_dir: env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            seed_demo_patients,
        };

        info!(
            "API configuration: port={}, data_dir={}, public_base_url={}, seed_demo_patients={}",
            config.port, config.data_dir, config.public_base_url, config.seed_demo_patients
        );

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.public_base_url, "http://localhost:3000/centro");
        assert!(config.seed_demo_patients);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
