//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the report client and the outside world (remote service, UI).

mod presenter;
mod scoring;

pub use presenter::{Presenter, Region, ReportView};
pub use scoring::{ScoringService, TransportError};
