//! Health report types returned by the scoring service.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Message shown when the service rejects a request without saying why,
/// or answers with an incomplete payload.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate health report. Please try again.";

/// Three-level colour tier used for the score ring and the BMI category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// Green
    Healthy,
    /// Amber
    Caution,
    /// Red
    Alert,
}

impl Tier {
    /// Tier of a (possibly mid-animation) health score.
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Healthy
        } else if score >= 60.0 {
            Self::Caution
        } else {
            Self::Alert
        }
    }

    /// Tier of a BMI category label.
    ///
    /// Normal weight is healthy; under- and overweight are cautions; any other
    /// label (obese, unknown) is an alert.
    #[must_use]
    pub fn for_bmi_category(category: &str) -> Self {
        match category.trim().to_ascii_lowercase().as_str() {
            "normal weight" | "normal" => Self::Healthy,
            "underweight" | "overweight" => Self::Caution,
            _ => Self::Alert,
        }
    }
}

/// Echo of the submitted values included in some responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedValues {
    pub gender: String,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
}

/// Response body of `POST /api/health-report`.
///
/// Every field is optional on the wire; [`ReportResponse::into_report`]
/// decides whether the payload is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub health_score: Option<f64>,

    #[serde(default)]
    pub bmi: Option<f64>,

    #[serde(default)]
    pub bmi_category: Option<String>,

    #[serde(default)]
    pub recommendations: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub user_data: Option<SubmittedValues>,
}

impl ReportResponse {
    /// A successful response carrying a full report.
    #[must_use]
    pub fn success(report: &HealthReport) -> Self {
        Self {
            success: true,
            health_score: Some(report.health_score),
            bmi: Some(report.bmi),
            bmi_category: Some(report.bmi_category.clone()),
            recommendations: Some(report.recommendations.clone()),
            ..Self::default()
        }
    }

    /// A service-reported failure.
    #[must_use]
    pub fn failure(error: Option<&str>) -> Self {
        Self {
            success: false,
            error: error.map(String::from),
            ..Self::default()
        }
    }

    /// Convert into a complete report.
    ///
    /// # Errors
    /// Returns the message to show when the service reported failure or the
    /// payload is missing a field.
    pub fn into_report(self) -> Result<HealthReport, String> {
        if !self.success {
            return Err(self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()));
        }

        match (
            self.health_score,
            self.bmi,
            self.bmi_category,
            self.recommendations,
        ) {
            (Some(health_score), Some(bmi), Some(bmi_category), Some(recommendations))
                if health_score.is_finite() && bmi.is_finite() =>
            {
                Ok(HealthReport {
                    health_score,
                    bmi,
                    bmi_category,
                    recommendations,
                })
            }
            _ => {
                tracing::warn!("Scoring service reported success with an incomplete payload");
                Err(GENERIC_FAILURE_MESSAGE.to_string())
            }
        }
    }
}

/// A complete, successful health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// 0-100 summary score
    pub health_score: f64,

    /// Body Mass Index
    pub bmi: f64,

    /// e.g. "Normal weight", "Obese"
    pub bmi_category: String,

    /// Free text, may contain `**emphasis**` and line breaks
    pub recommendations: String,
}

impl HealthReport {
    /// BMI with one decimal place, exact ties rounded up.
    #[must_use]
    pub fn bmi_display(&self) -> String {
        format!("{:.1}", round_ties_up_to_tenths(self.bmi))
    }

    #[must_use]
    pub fn bmi_tier(&self) -> Tier {
        Tier::for_bmi_category(&self.bmi_category)
    }
}

/// School details served by `GET /api/school-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolInfo {
    pub name: String,
    #[serde(default)]
    pub taluka: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub dise_code: String,
}

/// `{:.1}` rounds the exact binary value, sending exact ties to even.
/// Only `x.25` and `x.75` are exact ties at one decimal, so those are
/// rounded half up first; every other value is already unambiguous.
fn round_ties_up_to_tenths(value: f64) -> f64 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (value * 10.0 + 0.5).floor() / 10.0
    } else {
        value
    }
}

static EMPHASIS: OnceLock<Regex> = OnceLock::new();
static LINE_BREAKS: OnceLock<Regex> = OnceLock::new();

/// Flatten recommendation text to a single plain run.
///
/// `**bold**` markers are dropped (the text stays), and every run of line
/// breaks collapses to one space.
#[must_use]
pub fn format_recommendations(text: &str) -> String {
    let emphasis = EMPHASIS.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("Valid regex"));
    let breaks =
        LINE_BREAKS.get_or_init(|| Regex::new(r"[ \t]*(?:\r?\n)+[ \t]*").expect("Valid regex"));

    let plain = emphasis.replace_all(text, "$1");
    breaks.replace_all(&plain, " ").trim().to_string()
}
