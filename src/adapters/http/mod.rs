//! HTTP adapter for the scoring service (reqwest).
//!
//! Bodies are decoded whatever the status code: the service reports its own
//! validation failures as 4xx/5xx with a `success: false` JSON body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::domain::{FormInput, ReportResponse, SchoolInfo};
use crate::ports::{ScoringService, TransportError};
use crate::ReportError;

const REPORT_PATH: &str = "/api/health-report";
const SCHOOL_INFO_PATH: &str = "/api/school-info";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SchoolInfoResponse {
    #[serde(default)]
    success: bool,
    school: Option<SchoolInfo>,
}

/// Scoring service reached over HTTP(S).
#[derive(Clone)]
pub struct HttpScoringService {
    client: Client,
    base_url: String,
}

impl HttpScoringService {
    /// Build the HTTP client for `config.base_url`.
    ///
    /// # Errors
    /// Returns `ReportError::Config` if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("healthreport/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_body(
        resp: reqwest::Response,
    ) -> Result<(reqwest::StatusCode, String), TransportError> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl ScoringService for HttpScoringService {
    async fn generate_report(&self, input: &FormInput) -> Result<ReportResponse, TransportError> {
        let resp = self
            .client
            .post(self.url(REPORT_PATH))
            .json(input)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let (status, body) = Self::read_body(resp).await?;
        tracing::debug!(%status, bytes = body.len(), "Health report response received");

        serde_json::from_str::<ReportResponse>(&body).map_err(|e| {
            tracing::warn!(%status, "Health report response is not valid JSON");
            TransportError::Decode(e.to_string())
        })
    }

    async fn fetch_school_info(&self) -> Result<SchoolInfo, TransportError> {
        let resp = self
            .client
            .get(self.url(SCHOOL_INFO_PATH))
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let (status, body) = Self::read_body(resp).await?;
        if !status.is_success() {
            return Err(TransportError::Request(format!(
                "school info request failed: {status}"
            )));
        }

        let parsed: SchoolInfoResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        match parsed.school {
            Some(school) if parsed.success => Ok(school),
            _ => Err(TransportError::Decode(
                "school info response has no school".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_without_double_slash() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:5000/")
            .expect("valid url");
        let service = HttpScoringService::new(&config).expect("Should build");
        assert_eq!(service.base_url(), "http://127.0.0.1:5000");
        assert_eq!(
            service.url(REPORT_PATH),
            "http://127.0.0.1:5000/api/health-report"
        );
    }
}
