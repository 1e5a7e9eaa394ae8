//! Main TUI application loop.
//!
//! Handles:
//! - Input event handling per screen
//! - Drawing the shared view state
//! - Handing submissions to the runtime so the UI never blocks

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::runtime::Handle;

use crate::application::ReportClient;
use crate::domain::{Language, Session, UiMode};
use crate::ports::ScoringService;

use super::presenter::TuiPresenter;
use super::ui::{form::render_report_form, render_disclaimer, results::render_results};

/// Lines moved per arrow press on the results screen.
const SCROLL_STEP: i32 = 1;

/// Main application state
pub struct App<S: ScoringService + 'static> {
    client: Arc<ReportClient<S, TuiPresenter>>,
    presenter: Arc<TuiPresenter>,
    session: Session,
    runtime: Handle,
    should_quit: bool,
}

impl<S: ScoringService + 'static> App<S> {
    /// Create the application from an already-wired client.
    pub fn new(
        client: Arc<ReportClient<S, TuiPresenter>>,
        presenter: Arc<TuiPresenter>,
        runtime: Handle,
    ) -> Self {
        let session = Session::default();
        presenter.update(|state| state.language = session.language());

        Self {
            client,
            presenter,
            session,
            runtime,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(f.area());

                self.presenter.view(|state| match state.mode {
                    UiMode::Form => render_report_form(f, chunks[0], state),
                    UiMode::Results => render_results(f, chunks[0], state),
                });

                render_disclaimer(f, chunks[1]);
            })?;

            // Short poll keeps the score animation smooth
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('e') => self.select_language(Language::English),
                KeyCode::Char('g') => self.select_language(Language::Gujarati),
                _ => {}
            }
            return;
        }

        match self.client.mode() {
            UiMode::Form => self.handle_form_key(key),
            UiMode::Results => self.handle_results_key(key),
        }
    }

    fn select_language(&mut self, language: Language) {
        self.client.set_language_preference(&mut self.session, language);
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.presenter.update(|s| s.form.prev_field()),
            KeyCode::Down | KeyCode::Tab => self.presenter.update(|s| s.form.next_field()),
            KeyCode::Left | KeyCode::Right => {
                let forward = key == KeyCode::Right;
                self.presenter.update(|s| {
                    if s.form.gender_selected() {
                        s.form.cycle_gender(forward);
                    }
                });
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.presenter.update(|s| s.form.load_sample_data());
            }
            KeyCode::Char(c) => self.presenter.update(|s| s.form.input_char(c)),
            KeyCode::Backspace => self.presenter.update(|s| s.form.delete_char()),
            KeyCode::Delete => self.presenter.update(|s| s.form.clear_field()),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => {
                self.client.show_form();
            }
            KeyCode::Up => self.presenter.scroll_results(-SCROLL_STEP),
            KeyCode::Down => self.presenter.scroll_results(SCROLL_STEP),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        if self.client.is_loading() {
            return;
        }

        let raw = self.presenter.view(|s| s.form.to_raw_values());
        let session = self.session;
        let client = self.client.clone();

        self.runtime.spawn(async move {
            let outcome = client.submit_report(&session, &raw).await;
            tracing::debug!(?outcome, "Submission finished");
        });
    }
}
