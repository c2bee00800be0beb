//! Commerce configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TECHHAVEN_STORE_URL` - Base URL of the resource store API
//!
//! ## Optional
//! - `TECHHAVEN_STORE_TOKEN` - Bearer token for the resource store
//! - `TECHHAVEN_STORE_TIMEOUT_SECS` - HTTP timeout in seconds (default: 10)
//! - `TECHHAVEN_TAX_RATE` - Tax rate as a fraction (default: 0.10)
//! - `TECHHAVEN_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is
//!   free for ship orders (default: 500)
//! - `TECHHAVEN_SHIPPING_FEE` - Flat shipping fee below the threshold
//!   (default: 50)
//! - `TECHHAVEN_SESSION_CACHE` - Path for the session's JSON file mirror
//!   (default: no mirror)

use std::path::PathBuf;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level commerce configuration.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Resource store connection settings.
    pub store: StoreConfig,
    /// Checkout totals parameters.
    pub checkout: CheckoutConfig,
    /// Path for the session file mirror, if one is wanted.
    pub session_cache_path: Option<PathBuf>,
}

/// Resource store connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the resource store API.
    pub base_url: String,
    /// Bearer token, if the store requires one.
    pub api_token: Option<SecretString>,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Parameters for checkout totals.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Tax rate applied to the subtotal, as a fraction in `[0, 1)`.
    pub tax_rate: Decimal,
    /// Subtotal above which ship orders get free shipping.
    pub free_shipping_threshold: Decimal,
    /// Flat shipping fee charged at or below the threshold.
    pub shipping_fee: Decimal,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            free_shipping_threshold: Decimal::from(500),
            shipping_fee: Decimal::from(50),
        }
    }
}

impl CommerceConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` first if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("TECHHAVEN_STORE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TECHHAVEN_STORE_URL".to_owned(), e.to_string())
        })?;

        let timeout_secs = get_env_or_default("TECHHAVEN_STORE_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TECHHAVEN_STORE_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;

        let tax_rate = get_decimal_or_default("TECHHAVEN_TAX_RATE", "0.10")?;
        if tax_rate < Decimal::ZERO || tax_rate >= Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "TECHHAVEN_TAX_RATE".to_owned(),
                format!("must be in [0, 1), got {tax_rate}"),
            ));
        }

        Ok(Self {
            store: StoreConfig {
                base_url,
                api_token: get_optional_env("TECHHAVEN_STORE_TOKEN").map(SecretString::from),
                timeout_secs,
            },
            checkout: CheckoutConfig {
                tax_rate,
                free_shipping_threshold: get_decimal_or_default(
                    "TECHHAVEN_FREE_SHIPPING_THRESHOLD",
                    "500",
                )?,
                shipping_fee: get_decimal_or_default("TECHHAVEN_SHIPPING_FEE", "50")?,
            },
            session_cache_path: get_optional_env("TECHHAVEN_SESSION_CACHE").map(PathBuf::from),
        })
    }

    /// A configuration pointing at the given store URL, with default checkout
    /// parameters and no session mirror. Used by tests and local tooling.
    #[must_use]
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            store: StoreConfig {
                base_url: base_url.into(),
                api_token: None,
                timeout_secs: 10,
            },
            checkout: CheckoutConfig::default(),
            session_cache_path: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable as a decimal, with a default.
fn get_decimal_or_default(key: &str, default: &str) -> Result<Decimal, ConfigError> {
    get_env_or_default(key, default)
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}
