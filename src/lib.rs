//! # healthreport
//!
//! Terminal client for the school health-report service.
//!
//! This crate provides:
//! - Validation of biometric form input (gender, age, height, weight)
//! - A client for the remote `/api/health-report` scoring endpoint
//! - Rendering of the score, BMI category and recommendations
//! - Terminal UI for interactive use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (form input, report response, session, score animation)
//! - `ports`: Trait definitions for the scoring service and the presentation layer
//! - `adapters`: Concrete implementations (reqwest HTTP client, log redaction)
//! - `application`: The report client orchestrating submit / render flows
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{ReportClient, SubmitOutcome};
pub use config::{ClientConfig, LogConfig};
pub use domain::{FormInput, Language, RawFormValues, ReportResponse, Session, UiMode};

/// Result type for healthreport operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Main error type for healthreport
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid configuration: {0}")]
    Config(String),
}
