//! Presenter port: Trait for everything the client shows on screen.
//!
//! The report client never touches widgets directly. A UI adapter
//! implements this trait; tests implement it with a recorder.

use chrono::{DateTime, Local};

use crate::domain::{
    format_recommendations, HealthReport, Language, ScoreFrame, SchoolInfo, Tier, UiMode,
};

/// Screen region that can be brought into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Form,
    Results,
    ErrorBanner,
}

/// Everything on the results screen except the animated score.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    /// BMI with one decimal
    pub bmi: String,
    pub bmi_category: String,
    pub bmi_tier: Tier,
    /// Flattened plain text
    pub recommendations: String,
    pub generated_at: DateTime<Local>,
}

impl ReportView {
    #[must_use]
    pub fn from_report(report: &HealthReport) -> Self {
        Self {
            bmi: report.bmi_display(),
            bmi_category: report.bmi_category.clone(),
            bmi_tier: report.bmi_tier(),
            recommendations: format_recommendations(&report.recommendations),
            generated_at: Local::now(),
        }
    }
}

/// Trait for UI side effects.
///
/// Called from the async runtime (animation and banner timers), so
/// implementations must be thread-safe.
pub trait Presenter: Send + Sync + 'static {
    /// Switch the visible screen.
    fn show_mode(&self, mode: UiMode);

    /// Disable/enable submission and swap the submit affordance.
    fn set_loading(&self, loading: bool);

    /// Show the error banner with `message`, replacing any previous one.
    fn show_error(&self, message: &str);

    /// Hide the error banner.
    fn hide_error(&self);

    /// Draw one frame of the score animation.
    fn render_score(&self, frame: ScoreFrame);

    /// Draw BMI and recommendations.
    fn render_report(&self, view: &ReportView);

    /// Highlight the active language toggle.
    fn set_language(&self, language: Language);

    /// Clear every form field back to its default.
    fn reset_form(&self);

    /// Bring a region into view.
    fn scroll_into_view(&self, region: Region);

    /// Show school details. Optional.
    fn show_school_info(&self, _info: &SchoolInfo) {}
}
