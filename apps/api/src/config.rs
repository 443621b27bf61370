use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::explanation::ParserKind;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external matching service, e.g. `http://10.0.0.5:8000`.
    pub match_api_base_url: String,
    /// None = wait indefinitely for the matching service.
    pub match_api_timeout: Option<Duration>,
    pub explanation_parser: ParserKind,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source. `from_env` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let match_api_base_url = lookup("MATCH_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'MATCH_API_BASE_URL' is not set")?;

        let match_api_timeout = match lookup("MATCH_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .context("MATCH_API_TIMEOUT_SECS must be a whole number of seconds")?;
                if secs == 0 {
                    return Err(anyhow!("MATCH_API_TIMEOUT_SECS must be greater than zero"));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let explanation_parser = match lookup("EXPLANATION_PARSER") {
            Some(raw) => raw.parse::<ParserKind>().map_err(|e| anyhow!(e))?,
            None => ParserKind::default(),
        };

        Ok(Config {
            match_api_base_url: match_api_base_url.trim().to_string(),
            match_api_timeout,
            explanation_parser,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
