//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.
//!
//! The processor secret key is only ever sourced from the environment; there is
//! no fallback value compiled into the binary.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `API_KEY` (required): secret key for the payment processor
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `PROCESSOR_BASE_URL` (optional): processor API base URL, defaults to the
///   live Stripe endpoint; point it at a sandbox for testing
/// - `CURRENCY` (optional): ISO 4217 code charges are made in, defaults to "usd"
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    pub api_key: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_processor_base_url")]
    pub processor_base_url: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

/// Default processor endpoint if PROCESSOR_BASE_URL is not set.
fn default_processor_base_url() -> String {
    "https://api.stripe.com".to_string()
}

/// Default charge currency if CURRENCY is not set.
fn default_currency() -> String {
    "usd".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config
    /// struct, then validates the processor base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL, API_KEY)
    /// - Environment variable values cannot be parsed into expected types
    /// - PROCESSOR_BASE_URL is not a valid absolute http(s) URL
    pub fn from_env() -> anyhow::Result<Self> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        let config = envy::from_env::<Config>()?;
        config.validate()?;

        Ok(config)
    }

    /// Check that configured values are usable before the server starts.
    fn validate(&self) -> anyhow::Result<()> {
        let parsed = url::Url::parse(&self.processor_base_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!(
                "PROCESSOR_BASE_URL must be an http(s) URL, got scheme {:?}",
                parsed.scheme()
            );
        }

        if self.api_key.trim().is_empty() {
            anyhow::bail!("API_KEY must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Config, envy::Error> {
        envy::from_iter::<_, Config>(pairs)
    }

    #[test]
    fn test_defaults_applied_for_optional_fields() {
        let config = from_pairs(vec![
            (
                "DATABASE_URL".to_string(),
                "postgres://localhost/payments".to_string(),
            ),
            ("API_KEY".to_string(), "sk_test_abc".to_string()),
        ])
        .expect("config should parse with only required variables");

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.processor_base_url, "https://api.stripe.com");
        assert_eq!(config.currency, "usd");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result = from_pairs(vec![(
            "DATABASE_URL".to_string(),
            "postgres://localhost/payments".to_string(),
        )]);

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_processor_url_rejected() {
        let config = from_pairs(vec![
            (
                "DATABASE_URL".to_string(),
                "postgres://localhost/payments".to_string(),
            ),
            ("API_KEY".to_string(), "sk_test_abc".to_string()),
            ("PROCESSOR_BASE_URL".to_string(), "not a url".to_string()),
        ])
        .expect("envy itself does not validate URLs");

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let config = from_pairs(vec![
            (
                "DATABASE_URL".to_string(),
                "postgres://localhost/payments".to_string(),
            ),
            ("API_KEY".to_string(), "   ".to_string()),
        ])
        .expect("envy accepts blank strings");

        assert!(config.validate().is_err());
    }
}
