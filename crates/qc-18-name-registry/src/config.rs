//! Configuration for the Name Registry Subsystem

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::encoding::NameEncoding;

/// Default number of names returned by a scan without an explicit count.
pub const DEFAULT_SCAN_COUNT: u32 = 500;

/// Process-wide name registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameRegistryConfig {
    /// Encoding of names when a request does not pick one.
    pub name_encoding: NameEncoding,
    /// Encoding of values when a request does not pick one.
    pub value_encoding: NameEncoding,
    /// Count used by `scan` when the caller passes none.
    pub default_scan_count: u32,
    /// Refuse lookup/history/scan/export while the chain is syncing.
    pub reject_during_sync: bool,
}

impl Default for NameRegistryConfig {
    fn default() -> Self {
        Self {
            name_encoding: NameEncoding::Ascii,
            value_encoding: NameEncoding::Ascii,
            default_scan_count: DEFAULT_SCAN_COUNT,
            reject_during_sync: true,
        }
    }
}

impl NameRegistryConfig {
    /// Defaults overridden from `QC_NAME_ENCODING`, `QC_VALUE_ENCODING`
    /// and `QC_NAME_SCAN_COUNT`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment, flags, tests).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("QC_NAME_ENCODING") {
            match raw.parse() {
                Ok(encoding) => self.name_encoding = encoding,
                Err(e) => warn!("QC_NAME_ENCODING ignored: {}", e),
            }
        }
        if let Some(raw) = lookup("QC_VALUE_ENCODING") {
            match raw.parse() {
                Ok(encoding) => self.value_encoding = encoding,
                Err(e) => warn!("QC_VALUE_ENCODING ignored: {}", e),
            }
        }
        if let Some(raw) = lookup("QC_NAME_SCAN_COUNT") {
            match raw.parse() {
                Ok(count) => self.default_scan_count = count,
                Err(_) => warn!("QC_NAME_SCAN_COUNT must be a positive integer, got {}", raw),
            }
        }
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_scan_count == 0 {
            return Err(ConfigError::InvalidScanCount);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("default_scan_count cannot be 0")]
    InvalidScanCount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = NameRegistryConfig::default();
        assert_eq!(config.name_encoding, NameEncoding::Ascii);
        assert_eq!(config.value_encoding, NameEncoding::Ascii);
        assert_eq!(config.default_scan_count, 500);
        assert!(config.reject_during_sync);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QC_NAME_ENCODING", "utf8"),
            ("QC_VALUE_ENCODING", "hex"),
            ("QC_NAME_SCAN_COUNT", "25"),
        ]
        .into_iter()
        .collect();
        let config = NameRegistryConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.name_encoding, NameEncoding::Utf8);
        assert_eq!(config.value_encoding, NameEncoding::Hex);
        assert_eq!(config.default_scan_count, 25);
    }

    #[test]
    fn test_bad_overrides_keep_defaults() {
        let config = NameRegistryConfig::default().with_overrides(|key| match key {
            "QC_NAME_ENCODING" => Some("latin1".to_string()),
            "QC_NAME_SCAN_COUNT" => Some("-3".to_string()),
            _ => None,
        });
        assert_eq!(config, NameRegistryConfig::default());
    }

    #[test]
    fn test_zero_scan_count_rejected() {
        let config = NameRegistryConfig {
            default_scan_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidScanCount));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: NameRegistryConfig =
            serde_json::from_str(r#"{"value_encoding":"utf8"}"#).unwrap();
        assert_eq!(config.value_encoding, NameEncoding::Utf8);
        assert_eq!(config.name_encoding, NameEncoding::Ascii);
    }
}
