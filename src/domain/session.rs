//! Per-session preferences and the two-screen view selector.

use super::Language;

/// Which screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Form,
    Results,
}

/// Session context passed into each submission.
///
/// Only the language preference lives here; it affects nothing but the
/// `language` field of future requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    language: Language,
}

impl Session {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}
