//! HTTP client for the flight CRUD service.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::domain::FlightRecord;

use super::FlightsPayload;
use super::error::RepositoryError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP flight repository.
#[derive(Debug, Clone)]
pub struct HttpFlightConfig {
    /// Base URL of the CRUD service; flights are read from `{base_url}/flights`.
    pub base_url: String,
    /// Optional key sent as the `x-apikey` header
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpFlightConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Authenticate with an API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Reads the full flight list from the surrounding CRUD service.
#[derive(Debug, Clone)]
pub struct HttpFlightRepository {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFlightRepository {
    /// Create a new client.
    pub fn new(config: HttpFlightConfig) -> Result<Self, RepositoryError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                RepositoryError::NotConfigured("API key is not a valid header value".to_string())
            })?;
            headers.insert(HeaderName::from_static("x-apikey"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL the flight list is fetched from.
    pub fn flights_url(&self) -> String {
        format!("{}/flights", self.base_url)
    }

    /// Fetch every flight record.
    pub async fn fetch_all(&self) -> Result<Vec<FlightRecord>, RepositoryError> {
        let url = self.flights_url();
        debug!(%url, "Fetching flights");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RepositoryError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let payload: FlightsPayload =
            serde_json::from_str(&body).map_err(|e| RepositoryError::Json {
                message: e.to_string(),
            })?;

        Ok(payload.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpFlightConfig::new("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn config_builders() {
        let config = HttpFlightConfig::new("http://localhost:8080")
            .with_api_key("secret")
            .with_timeout(5);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn flights_url_strips_trailing_slash() {
        let repo = HttpFlightRepository::new(HttpFlightConfig::new("http://localhost:8080/api/"))
            .unwrap();
        assert_eq!(repo.flights_url(), "http://localhost:8080/api/flights");
    }

    #[test]
    fn rejects_bad_api_key() {
        let result =
            HttpFlightRepository::new(HttpFlightConfig::new("http://x").with_api_key("bad\nkey"));
        assert!(matches!(result, Err(RepositoryError::NotConfigured(_))));
    }
}
