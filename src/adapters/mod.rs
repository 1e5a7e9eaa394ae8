//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest client for the scoring service
//! - `redact`: biometric and credential filtering for logs

pub mod http;
pub mod redact;

pub use http::HttpScoringService;
pub use redact::RedactingMakeWriter;
