//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the report flow of the client.

mod report_client;
mod tasks;

pub use report_client::{
    ReportClient, SubmitOutcome, CONNECTION_ERROR_MESSAGE, ERROR_DISMISS_AFTER,
};
