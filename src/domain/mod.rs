//! Domain layer: Core types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable or plain data and are validated on construction.

mod animation;
mod form;
mod report;
mod session;

pub use animation::{
    ScoreAnimation, ScoreFrame, FRAME_INTERVAL, RING_CIRCUMFERENCE, SCORE_ANIMATION_DURATION,
};
pub use form::{
    FormInput, Gender, Language, RawFormValues, ValidationError, AGE_RANGE, HEIGHT_RANGE_CM,
    WEIGHT_RANGE_KG,
};
pub use report::{
    format_recommendations, HealthReport, ReportResponse, SchoolInfo, SubmittedValues, Tier,
    GENERIC_FAILURE_MESSAGE,
};
pub use session::{Session, UiMode};
