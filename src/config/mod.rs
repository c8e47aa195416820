use crate::core::extractor::RetryPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://otx.alienvault.com/api/v1";
const DEFAULT_CONNECTION_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "etl_data";
const DEFAULT_COLLECTION: &str = "pulses";

#[derive(Debug, Clone, Parser)]
#[command(name = "pulse-sync")]
#[command(about = "Sync threat-intel pulses from a remote feed into MongoDB")]
pub struct CliConfig {
    /// Feed base URL; falls back to API_BASE_URL, then the built-in default
    #[arg(long)]
    pub base_url: Option<String>,

    /// Feed resource to pull, relative to the base URL
    #[arg(long, default_value = "pulses/subscribed")]
    pub resource: String,

    /// Page size requested from the feed (sent as the `limit` query parameter)
    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "3")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "2")]
    pub retry_delay_seconds: u64,

    /// Target collection; falls back to COLLECTION_NAME
    #[arg(long)]
    pub collection: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

/// Fully resolved runtime settings: CLI flags override environment
/// variables, which override the built-in defaults. The credential is kept
/// optional here; the extractor fails fast when it is required but absent.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub resource: String,
    pub page_size: Option<u32>,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub connection_uri: String,
    pub database: String,
    pub collection: String,
}

impl Settings {
    pub fn resolve(cli: &CliConfig) -> Self {
        // Best effort: a missing .env file is not an error.
        let _ = dotenv::dotenv();

        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| env_var("API_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: env_var("API_KEY"),
            resource: cli.resource.clone(),
            page_size: cli.limit,
            request_timeout: Duration::from_secs(cli.timeout_seconds),
            retry: RetryPolicy {
                max_attempts: cli.retry_attempts,
                base_delay: Duration::from_secs(cli.retry_delay_seconds),
            },
            connection_uri: env_var("CONNECTION_URI")
                .unwrap_or_else(|| DEFAULT_CONNECTION_URI.to_string()),
            database: env_var("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: cli
                .collection
                .clone()
                .or_else(|| env_var("COLLECTION_NAME"))
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_non_empty_string("resource", &self.resource)?;
        validate_non_empty_string("connection_uri", &self.connection_uri)?;
        validate_non_empty_string("database", &self.database)?;
        validate_non_empty_string("collection", &self.collection)?;
        validate_positive_number("retry_attempts", self.retry.max_attempts as usize, 1)?;
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    fn settings() -> Settings {
        Settings {
            base_url: "https://feed.example.com/api/v1".to_string(),
            api_key: Some("sekrit".to_string()),
            resource: "pulses/subscribed".to_string(),
            page_size: None,
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            connection_uri: "mongodb://localhost:27017".to_string(),
            database: "etl_data".to_string(),
            collection: "pulses".to_string(),
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut s = settings();
        s.base_url = "not a url".to_string();
        assert!(matches!(
            s.validate(),
            Err(EtlError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_zero_attempt_ceiling_rejected() {
        let mut s = settings();
        s.retry.max_attempts = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_blank_collection_rejected() {
        let mut s = settings();
        s.collection = "  ".to_string();
        assert!(s.validate().is_err());
    }
}
