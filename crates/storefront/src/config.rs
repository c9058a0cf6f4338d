//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults suit a local backend.
//! - `BAZAAR_BACKEND_ORIGIN` - Backend origin (default: `http://localhost:5000`)
//! - `BAZAAR_API_BASE` - API base path on the backend (default: `/api/v1`)
//! - `BAZAAR_DEV_HOST` - Dev proxy bind address (default: 127.0.0.1)
//! - `BAZAAR_DEV_PORT` - Dev proxy listen port (default: 5173)
//! - `BAZAAR_TOKEN_PATH` - Bearer token file (default: `.bazaar/token`)
//! - `RAZORPAY_KEY_ID` - Razorpay key id used by the checkout widget
//! - `RAZORPAY_CURRENCY` - Checkout currency (default: INR)
//! - `RAZORPAY_MERCHANT_NAME` - Name shown in checkout (default: Bazaar)
//! - `RAZORPAY_THEME_COLOR` - Checkout theme colour (default: #3399cc)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use bazaar_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend origin, e.g. `http://localhost:5000`
    pub backend_origin: Url,
    /// API base path on the backend, e.g. `/api/v1`
    pub api_base: String,
    /// IP address the dev proxy binds to
    pub dev_host: IpAddr,
    /// Port the dev proxy listens on
    pub dev_port: u16,
    /// File holding the bearer token between runs
    pub token_path: PathBuf,
    /// Razorpay checkout configuration
    pub razorpay: RazorpayConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Razorpay checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RazorpayConfig {
    /// Public key id handed to the checkout widget
    pub key_id: Option<String>,
    /// Currency for orders created by this client
    pub currency: CurrencyCode,
    /// Merchant name shown in the widget
    pub merchant_name: String,
    /// Widget theme colour
    pub theme_color: String,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            currency: CurrencyCode::INR,
            merchant_name: "Bazaar".to_string(),
            theme_color: "#3399cc".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let backend_origin = env
            .or_default("BAZAAR_BACKEND_ORIGIN", "http://localhost:5000")
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZAAR_BACKEND_ORIGIN".to_string(), e.to_string())
            })?;
        if backend_origin.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "BAZAAR_BACKEND_ORIGIN".to_string(),
                "must be an absolute http(s) origin".to_string(),
            ));
        }

        let api_base = normalize_base_path(&env.or_default("BAZAAR_API_BASE", "/api/v1"));

        let dev_host = env
            .or_default("BAZAAR_DEV_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZAAR_DEV_HOST".to_string(), e.to_string())
            })?;
        let dev_port = env
            .or_default("BAZAAR_DEV_PORT", "5173")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZAAR_DEV_PORT".to_string(), e.to_string())
            })?;

        let token_path = PathBuf::from(env.or_default("BAZAAR_TOKEN_PATH", ".bazaar/token"));

        let razorpay = RazorpayConfig::from_env(&env)?;

        Ok(Self {
            backend_origin,
            api_base,
            dev_host,
            dev_port,
            token_path,
            razorpay,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the dev proxy.
    #[must_use]
    pub const fn dev_socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.dev_host, self.dev_port)
    }

    /// Full base URL for API calls (origin joined with the base path).
    ///
    /// Always ends in `/` so relative endpoint paths join beneath it.
    #[must_use]
    pub fn api_base_url(&self) -> Url {
        let mut url = self.backend_origin.clone();
        url.set_path(&format!("{}/", self.api_base.trim_end_matches('/')));
        url
    }
}

impl RazorpayConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let key_id = env.optional("RAZORPAY_KEY_ID");
        if let Some(key) = &key_id {
            reject_placeholder(key, "RAZORPAY_KEY_ID")?;
        }

        let currency = match env.optional("RAZORPAY_CURRENCY") {
            Some(code) => code
                .parse::<CurrencyCode>()
                .map_err(|e| ConfigError::InvalidEnvVar("RAZORPAY_CURRENCY".to_string(), e))?,
            None => defaults.currency,
        };

        Ok(Self {
            key_id,
            currency,
            merchant_name: env
                .optional("RAZORPAY_MERCHANT_NAME")
                .unwrap_or(defaults.merchant_name),
            theme_color: env
                .optional("RAZORPAY_THEME_COLOR")
                .unwrap_or(defaults.theme_color),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Ensure a leading slash and no trailing slash (`api/v1/` -> `/api/v1`).
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Reject values copied verbatim from a sample `.env`.
fn reject_placeholder(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}
