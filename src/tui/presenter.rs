//! Terminal presenter: the [`Presenter`] port over shared view state.
//!
//! The report client and its timers write into [`ViewState`] from the
//! runtime; the render loop reads it once per frame.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Language, SchoolInfo, ScoreFrame, UiMode};
use crate::ports::{Presenter, Region, ReportView};

use super::ui::form::FormState;

/// Everything the render loop draws.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub mode: UiMode,
    pub loading: bool,
    pub error: Option<String>,
    pub score: Option<ScoreFrame>,
    pub results: Option<ReportView>,
    pub language: Language,
    pub form: FormState,
    pub school: Option<SchoolInfo>,
    /// First visible line of the recommendations
    pub results_scroll: u16,
    /// Region last brought into view
    pub focus: Region,
}

/// Thread-safe presenter backing the terminal UI.
#[derive(Debug, Clone, Default)]
pub struct TuiPresenter {
    state: Arc<Mutex<ViewState>>,
}

impl TuiPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        // A panicking timer must not take the UI down with it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the view state.
    pub fn view<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the view state from the input handler.
    pub fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn scroll_results(&self, delta: i32) {
        let mut state = self.lock();
        let next = i32::from(state.results_scroll).saturating_add(delta).max(0);
        state.results_scroll = u16::try_from(next).unwrap_or(u16::MAX);
    }
}

impl Presenter for TuiPresenter {
    fn show_mode(&self, mode: UiMode) {
        self.lock().mode = mode;
    }

    fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
    }

    fn show_error(&self, message: &str) {
        self.lock().error = Some(message.to_string());
    }

    fn hide_error(&self) {
        self.lock().error = None;
    }

    fn render_score(&self, frame: ScoreFrame) {
        self.lock().score = Some(frame);
    }

    fn render_report(&self, view: &ReportView) {
        let mut state = self.lock();
        state.results = Some(view.clone());
        state.results_scroll = 0;
    }

    fn set_language(&self, language: Language) {
        self.lock().language = language;
    }

    fn reset_form(&self) {
        let mut state = self.lock();
        state.form.reset();
        state.score = None;
        state.results = None;
        state.results_scroll = 0;
    }

    fn scroll_into_view(&self, region: Region) {
        let mut state = self.lock();
        state.focus = region;
        match region {
            Region::Results => state.results_scroll = 0,
            Region::Form => state.form.selected_field = 0,
            Region::ErrorBanner => {}
        }
    }

    fn show_school_info(&self, info: &SchoolInfo) {
        self.lock().school = Some(info.clone());
    }
}
