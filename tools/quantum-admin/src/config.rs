//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use quantum_commerce::cart::PricingConfig;
use quantum_commerce::checkout::TransitionPolicy;
use quantum_data::ApiConfig;

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["quantum.toml", ".quantum.toml", "quantum.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Tabular API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Shipping and tax settings used for quotes and order placement.
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub orders: OrdersConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AdminConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Problems that stop the CLI from working, and ones worth a look.
    pub fn check(&self) -> ConfigReport {
        let mut report = ConfigReport::default();

        if let Err(e) = self.api.validate() {
            report.errors.push(format!("api: {}", e));
        }
        if self.api.base_url.starts_with("http://") {
            report
                .warnings
                .push("api.base_url is not using https".to_string());
        }
        if self.api.timeout_secs > 120 {
            report.warnings.push(format!(
                "api.timeout_secs is {}s; commands may hang for a long time",
                self.api.timeout_secs
            ));
        }

        if let Err(e) = self.pricing.validate() {
            report.errors.push(format!("pricing: {}", e));
        }

        if EnvFilter::try_new(&self.logging.level).is_err() {
            report
                .errors
                .push(format!("logging.level '{}' is not a valid filter", self.logging.level));
        }

        if self.orders.status_transitions == TransitionPolicy::Unrestricted {
            report.warnings.push(
                "orders.status_transitions is 'unrestricted'; any status can be set from any status"
                    .to_string(),
            );
        }

        report
    }
}

/// Result of [`AdminConfig::check`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Order back-office settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// `unrestricted` (default) or `guarded`.
    #[serde(default)]
    pub status_transitions: TransitionPolicy,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single lines.
    #[default]
    Compact,
    /// One JSON object per event, for log aggregation.
    Json,
}

/// Generate a default quantum.toml config file.
pub fn generate_default_config(tenant_id: &str) -> String {
    format!(
        r#"# Quantum storefront admin configuration

[api]
base_url = "{base_url}"
tenant_id = "{tenant_id}"
database = "default"
timeout_secs = 30

[pricing]
currency = "USD"
shipping_flat_rate = 15.0
tax_rate = 0.08
charge_shipping_on_empty_cart = true

[orders]
# "unrestricted" lets any status be set from any status.
# "guarded" only allows forward moves (pending -> processing -> completed ...).
status_transitions = "unrestricted"

[logging]
level = "warn"
format = "compact"
"#,
        base_url = quantum_data::DEFAULT_BASE_URL,
        tenant_id = tenant_id
    )
}
