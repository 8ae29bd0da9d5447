use crate::api::error::{ApiError, Result};

const DEFAULT_BASE_URL: &str = "https://app.base44.com";

/// Connection settings for the hosted backend.
///
/// The API key is never hard-coded; it comes from `REWEAR_API_KEY`.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub app_id: String,
    pub api_key: String,
}

impl Config {
    /// Read configuration from `REWEAR_API_KEY`, `REWEAR_APP_ID` and
    /// optionally `REWEAR_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("REWEAR_API_KEY")
            .map_err(|_| ApiError::Config("REWEAR_API_KEY not set".into()))?;
        let app_id = std::env::var("REWEAR_APP_ID")
            .map_err(|_| ApiError::Config("REWEAR_APP_ID not set".into()))?;
        let base_url =
            std::env::var("REWEAR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url,
            app_id,
            api_key,
        })
    }
}
