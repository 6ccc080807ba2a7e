//! Connection settings for the tabular API.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::DataError;

pub const DEFAULT_BASE_URL: &str = "https://api.genabase.com";

/// The `[api]` section of the admin config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Tenant that owns the database. Required.
    pub tenant_id: String,
    pub database: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tenant_id: String::new(),
            database: "default".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DataError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.tenant_id.trim().is_empty() {
            return Err(DataError::Config("tenant_id is required".to_string()));
        }
        if self.database.trim().is_empty() {
            return Err(DataError::Config("database is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(DataError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_need_a_tenant() {
        let config = ApiConfig::default();
        assert_eq!(config.database, "default");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.validate(),
            Err(DataError::Config("tenant_id is required".into()))
        );
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: ApiConfig = serde_json::from_str(r#"{"tenant_id": "acme"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url_and_zero_timeout() {
        let config = ApiConfig {
            base_url: "ftp://example".into(),
            tenant_id: "acme".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            tenant_id: "acme".into(),
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
