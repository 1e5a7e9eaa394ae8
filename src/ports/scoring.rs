//! Scoring service port: Trait for the remote health-report collaborator.
//!
//! The service computes BMI, score and recommendations. This crate only
//! sends validated input and interprets the response.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{FormInput, ReportResponse, SchoolInfo};

/// Failure to obtain a decodable response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset, ...
    #[error("request failed: {0}")]
    Request(String),

    /// The body was not JSON of the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The client-side deadline expired.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Trait for the remote scoring service.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Request a health report for validated input.
    ///
    /// A `success: false` body is returned as `Ok`; only failures to get a
    /// decodable body are errors.
    ///
    /// # Errors
    /// Returns `TransportError` on network or decode failure.
    async fn generate_report(&self, input: &FormInput) -> Result<ReportResponse, TransportError>;

    /// Fetch the school details shown above the form.
    ///
    /// # Errors
    /// Returns `TransportError` on network or decode failure, or when the
    /// service has no school configured.
    async fn fetch_school_info(&self) -> Result<SchoolInfo, TransportError>;
}
