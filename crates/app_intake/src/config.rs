//! Intake configuration

use serde::Deserialize;

use domain_claims::MAX_FILE_BYTES;
use domain_policy::DEFAULT_WARRANTY_MONTHS;

/// Intake configuration
///
/// Every field has a default, so a partial environment overlays the
/// defaults instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    /// Maximum accepted upload size per file, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Warranty months assumed when the lookup service is unavailable
    #[serde(default = "default_fallback_warranty_months")]
    pub fallback_warranty_months: u32,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_upload_bytes() -> u64 {
    MAX_FILE_BYTES
}

fn default_fallback_warranty_months() -> u32 {
    DEFAULT_WARRANTY_MONTHS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            fallback_warranty_months: default_fallback_warranty_months(),
            log_level: default_log_level(),
        }
    }
}

impl IntakeConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("INTAKE"))
            .build()?
            .try_deserialize()
    }
}
