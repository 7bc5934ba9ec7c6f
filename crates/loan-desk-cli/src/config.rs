//! Desk configuration: where the loan API lives and how to log.
//!
//! Read from an optional YAML file; `--api-url` (or `LOAN_DESK_API_URL`)
//! overrides the file's URL.

use loan_desk_core::api::ApiConfig;
use serde::Deserialize;
use std::time::Duration;

use crate::input;
use crate::logging::LogFormat;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: loan_desk_core::api::http::DEFAULT_BASE_URL.to_string(),
            timeout_secs: loan_desk_core::api::http::DEFAULT_TIMEOUT.as_secs(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl DeskConfig {
    /// Load from `path` when given, defaults otherwise, then apply overrides.
    pub fn load(
        path: Option<&str>,
        api_url: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match path {
            Some(p) => Self::from_yaml(&input::file::read_text(p)?)
                .map_err(|e| format!("Invalid config '{}': {}", p, e))?,
            None => Self::default(),
        };
        if let Some(url) = api_url {
            config.api_url = url.to_string();
        }
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "api_url: https://loans.example.in/api\nlog_format: json\n";
        let config = DeskConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api_url, "https://loans.example.in/api");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(DeskConfig::from_yaml("api_uri: http://x\n").is_err());
    }

    #[test]
    fn test_flag_overrides_default_url() {
        let config = DeskConfig::load(None, Some("http://10.0.0.5:5000/api")).unwrap();
        assert_eq!(config.api_config().base_url, "http://10.0.0.5:5000/api");
        assert_eq!(config.api_config().timeout, Duration::from_secs(15));
    }
}
