//! Report client: Orchestrates the form → request → results flow.
//!
//! This service coordinates:
//! - Validation of raw form values
//! - The loading state around the single in-flight request
//! - The request itself, bounded by the configured timeout
//! - Rendering of results, the score animation and the error banner
//!
//! All UI effects go through the [`Presenter`] port; the remote service is
//! reached through the [`ScoringService`] port.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;

use super::tasks::{dismiss_error_after, run_score_animation, BannerGeneration, TaskSlot};
use crate::config::ClientConfig;
use crate::domain::{
    HealthReport, Language, RawFormValues, ScoreAnimation, Session, UiMode, ValidationError,
};
use crate::ports::{Presenter, Region, ReportView, ScoringService, TransportError};

/// How long an error banner stays up.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Banner text for any transport failure.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error. Please make sure the server is running.";

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Results are on screen
    Rendered(HealthReport),
    /// A form rule failed; nothing was sent
    Invalid(ValidationError),
    /// The service answered but did not produce a report
    Rejected(String),
    /// No usable answer (network, decode, timeout)
    Unreachable(TransportError),
    /// Another submission is still in flight; nothing was sent
    Busy,
}

#[derive(Debug, Default)]
struct ClientState {
    mode: UiMode,
    loading: bool,
    report: Option<HealthReport>,
}

/// Client for the remote health-report service.
pub struct ReportClient<S, P>
where
    S: ScoringService,
    P: Presenter,
{
    scoring: Arc<S>,
    presenter: Arc<P>,
    runtime: Handle,
    request_timeout: Duration,
    state: Mutex<ClientState>,
    banner: Arc<BannerGeneration>,
    animation: TaskSlot,
    dismissal: TaskSlot,
}

impl<S, P> ReportClient<S, P>
where
    S: ScoringService,
    P: Presenter,
{
    /// Create a new report client.
    ///
    /// Timers (score animation, banner dismissal) are spawned on `runtime`.
    pub fn new(
        scoring: Arc<S>,
        presenter: Arc<P>,
        config: &ClientConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            scoring,
            presenter,
            runtime,
            request_timeout: config.request_timeout,
            state: Mutex::new(ClientState::default()),
            banner: Arc::new(BannerGeneration::default()),
            animation: TaskSlot::default(),
            dismissal: TaskSlot::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Currently visible screen.
    #[must_use]
    pub fn mode(&self) -> UiMode {
        self.state().mode
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// The report on the results screen, if any.
    #[must_use]
    pub fn current_report(&self) -> Option<HealthReport> {
        self.state().report.clone()
    }

    /// Whether the score animation is still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    /// Select the language for future requests.
    pub fn set_language_preference(&self, session: &mut Session, language: Language) {
        session.set_language(language);
        self.presenter.set_language(language);
        tracing::debug!(%language, "Language preference changed");
    }

    /// Validate, send and render one health report request.
    ///
    /// Every exit path leaves the loading state, including cancellation of
    /// the returned future.
    pub async fn submit_report(&self, session: &Session, raw: &RawFormValues) -> SubmitOutcome {
        if self.is_loading() {
            tracing::warn!("Submission ignored: a report request is already in flight");
            return SubmitOutcome::Busy;
        }

        self.clear_error();

        let input = match raw.validate(session.language()) {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!(field = e.field(), "Form validation failed");
                self.show_error(&e.to_string());
                return SubmitOutcome::Invalid(e);
            }
        };

        let Some(_loading) = self.begin_loading() else {
            tracing::warn!("Submission ignored: a report request is already in flight");
            return SubmitOutcome::Busy;
        };

        tracing::info!(
            gender = input.gender.as_str(),
            language = %input.language,
            "Requesting health report"
        );

        let response =
            match tokio::time::timeout(self.request_timeout, self.scoring.generate_report(&input))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(self.request_timeout)),
            };

        match response {
            Ok(response) => match response.into_report() {
                Ok(report) => {
                    tracing::info!(
                        score = report.health_score,
                        category = %report.bmi_category,
                        "Health report received"
                    );
                    self.render_results(&report);
                    SubmitOutcome::Rendered(report)
                }
                Err(message) => {
                    tracing::warn!("Scoring service did not produce a report: {}", message);
                    self.show_error(&message);
                    SubmitOutcome::Rejected(message)
                }
            },
            Err(e) => {
                tracing::error!("Health report request failed: {}", e);
                self.show_error(CONNECTION_ERROR_MESSAGE);
                SubmitOutcome::Unreachable(e)
            }
        }
    }

    /// Switch to the results screen and draw `report`.
    ///
    /// Restarts the score animation; a previous one is aborted first.
    pub fn render_results(&self, report: &HealthReport) {
        {
            let mut state = self.state();
            state.mode = UiMode::Results;
            state.report = Some(report.clone());
        }

        self.presenter.show_mode(UiMode::Results);
        self.start_score_animation(report.health_score);
        self.presenter.render_report(&ReportView::from_report(report));
        self.presenter.scroll_into_view(Region::Results);
    }

    /// Switch to an empty form. Also used as the "new report" action.
    pub fn show_form(&self) {
        if self.animation.cancel() {
            tracing::debug!("Score animation cancelled on return to form");
        }
        self.clear_error();

        {
            let mut state = self.state();
            state.mode = UiMode::Form;
            state.report = None;
        }

        self.presenter.show_mode(UiMode::Form);
        self.presenter.reset_form();
        self.presenter.scroll_into_view(Region::Form);
    }

    /// Show `message` in the error banner for [`ERROR_DISMISS_AFTER`].
    ///
    /// A newer error supersedes the pending dismissal of an older one.
    pub fn show_error(&self, message: &str) {
        let generation = self.banner.advance(|generation| {
            self.presenter.show_error(message);
            generation
        });
        self.presenter.scroll_into_view(Region::ErrorBanner);

        let handle = self.runtime.spawn(dismiss_error_after(
            self.presenter.clone(),
            ERROR_DISMISS_AFTER,
            self.banner.clone(),
            generation,
        ));
        self.dismissal.replace(handle);
    }

    /// Fetch school details for the form header.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn load_school_info(&self) {
        match self.scoring.fetch_school_info().await {
            Ok(info) => {
                tracing::info!(school = %info.name, "School info loaded");
                self.presenter.show_school_info(&info);
            }
            Err(e) => tracing::warn!("School info unavailable: {}", e),
        }
    }

    fn clear_error(&self) {
        self.dismissal.cancel();
        self.banner.advance(|_| self.presenter.hide_error());
    }

    fn start_score_animation(&self, score: f64) {
        self.animation.cancel();
        let handle = self.runtime.spawn(run_score_animation(
            self.presenter.clone(),
            ScoreAnimation::new(score),
        ));
        self.animation.replace(handle);
    }

    fn begin_loading(&self) -> Option<LoadingGuard<'_, S, P>> {
        {
            let mut state = self.state();
            if state.loading {
                return None;
            }
            state.loading = true;
        }
        self.presenter.set_loading(true);
        Some(LoadingGuard { client: self })
    }

    fn finish_loading(&self) {
        self.state().loading = false;
        self.presenter.set_loading(false);
    }
}

/// Leaves the loading state when dropped.
struct LoadingGuard<'a, S, P>
where
    S: ScoringService,
    P: Presenter,
{
    client: &'a ReportClient<S, P>,
}

impl<S, P> Drop for LoadingGuard<'_, S, P>
where
    S: ScoringService,
    P: Presenter,
{
    fn drop(&mut self) {
        self.client.finish_loading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        FormInput, ReportResponse, SchoolInfo, ScoreFrame, Tier, GENERIC_FAILURE_MESSAGE,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Respond(ReportResponse),
        Fail(TransportError),
        Hang,
    }

    struct FakeScoring {
        reply: Reply,
        school: Option<SchoolInfo>,
        calls: AtomicUsize,
        last_input: Mutex<Option<FormInput>>,
    }

    impl FakeScoring {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                school: None,
                calls: AtomicUsize::new(0),
                last_input: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScoringService for FakeScoring {
        async fn generate_report(
            &self,
            input: &FormInput,
        ) -> Result<ReportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = Some(*input);
            match &self.reply {
                Reply::Respond(response) => Ok(response.clone()),
                Reply::Fail(e) => Err(e.clone()),
                Reply::Hang => std::future::pending().await,
            }
        }

        async fn fetch_school_info(&self) -> Result<SchoolInfo, TransportError> {
            self.school
                .clone()
                .ok_or_else(|| TransportError::Request("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct Screen {
        mode: UiMode,
        loading: bool,
        loading_history: Vec<bool>,
        error: Option<String>,
        errors_shown: Vec<String>,
        score: Option<ScoreFrame>,
        score_frames: usize,
        report: Option<ReportView>,
        language: Language,
        resets: usize,
        scrolls: Vec<Region>,
        school: Option<SchoolInfo>,
    }

    #[derive(Default)]
    struct RecordingPresenter {
        screen: Mutex<Screen>,
    }

    impl RecordingPresenter {
        fn screen(&self) -> MutexGuard<'_, Screen> {
            self.screen.lock().unwrap()
        }
    }

    impl Presenter for RecordingPresenter {
        fn show_mode(&self, mode: UiMode) {
            self.screen().mode = mode;
        }
        fn set_loading(&self, loading: bool) {
            let mut screen = self.screen();
            screen.loading = loading;
            screen.loading_history.push(loading);
        }
        fn show_error(&self, message: &str) {
            let mut screen = self.screen();
            screen.error = Some(message.to_string());
            screen.errors_shown.push(message.to_string());
        }
        fn hide_error(&self) {
            self.screen().error = None;
        }
        fn render_score(&self, frame: ScoreFrame) {
            let mut screen = self.screen();
            screen.score = Some(frame);
            screen.score_frames += 1;
        }
        fn render_report(&self, view: &ReportView) {
            self.screen().report = Some(view.clone());
        }
        fn set_language(&self, language: Language) {
            self.screen().language = language;
        }
        fn reset_form(&self) {
            self.screen().resets += 1;
        }
        fn scroll_into_view(&self, region: Region) {
            self.screen().scrolls.push(region);
        }
        fn show_school_info(&self, info: &SchoolInfo) {
            self.screen().school = Some(info.clone());
        }
    }

    type TestClient = ReportClient<FakeScoring, RecordingPresenter>;

    fn client_with(
        scoring: FakeScoring,
    ) -> (Arc<TestClient>, Arc<FakeScoring>, Arc<RecordingPresenter>) {
        let scoring = Arc::new(scoring);
        let presenter = Arc::new(RecordingPresenter::default());
        let client = ReportClient::new(
            scoring.clone(),
            presenter.clone(),
            &ClientConfig::default(),
            Handle::current(),
        );
        (Arc::new(client), scoring, presenter)
    }

    fn valid_form() -> RawFormValues {
        RawFormValues {
            gender: "female".to_string(),
            age: "11".to_string(),
            height: "142".to_string(),
            weight: "36.5".to_string(),
        }
    }

    fn sample_report(score: f64) -> HealthReport {
        HealthReport {
            health_score: score,
            bmi: 23.4,
            bmi_category: "Normal weight".to_string(),
            recommendations: "**Eat** more\n\nvegetables".to_string(),
        }
    }

    async fn settle(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_never_reaches_network() {
        let (client, scoring, presenter) =
            client_with(FakeScoring::new(Reply::Respond(ReportResponse::default())));
        let session = Session::default();

        let cases = [
            (
                RawFormValues {
                    gender: String::new(),
                    ..valid_form()
                },
                "Please select your gender",
            ),
            (
                RawFormValues {
                    age: "0".into(),
                    ..valid_form()
                },
                "Age must be between 1 and 100 years",
            ),
            (
                RawFormValues {
                    height: "251".into(),
                    ..valid_form()
                },
                "Height must be between 30 and 250 cm",
            ),
            (
                RawFormValues {
                    weight: "4".into(),
                    ..valid_form()
                },
                "Weight must be between 5 and 200 kg",
            ),
        ];

        for (raw, message) in cases {
            let outcome = client.submit_report(&session, &raw).await;
            assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
            assert_eq!(presenter.screen().error.as_deref(), Some(message));
        }

        assert_eq!(scoring.calls(), 0);
        assert!(presenter.screen().loading_history.is_empty());
        assert_eq!(client.mode(), UiMode::Form);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_report_renders_results() {
        let (client, scoring, presenter) = client_with(FakeScoring::new(Reply::Respond(
            ReportResponse::success(&sample_report(72.0)),
        )));

        let outcome = client.submit_report(&Session::default(), &valid_form()).await;
        assert!(matches!(outcome, SubmitOutcome::Rendered(_)));
        assert_eq!(scoring.calls(), 1);
        assert_eq!(client.mode(), UiMode::Results);
        assert!(!client.is_loading());

        {
            let screen = presenter.screen();
            assert_eq!(screen.mode, UiMode::Results);
            assert_eq!(screen.loading_history, vec![true, false]);
            let view = screen.report.as_ref().expect("report rendered");
            assert_eq!(view.bmi, "23.4");
            assert_eq!(view.bmi_category, "Normal weight");
            assert_eq!(view.bmi_tier, Tier::Healthy);
            assert_eq!(view.recommendations, "Eat more vegetables");
            assert_eq!(screen.scrolls.last(), Some(&Region::Results));
        }

        settle(Duration::from_secs(3)).await;

        let screen = presenter.screen();
        let frame = screen.score.expect("score rendered");
        assert_eq!(frame.displayed, 72);
        assert!(frame.finished);
        assert_eq!(frame.tier, Tier::Caution);
        assert!(!client.is_animating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_error_keeps_form() {
        let (client, _, presenter) = client_with(FakeScoring::new(Reply::Respond(
            ReportResponse::failure(Some("Invalid input")),
        )));

        let outcome = client.submit_report(&Session::default(), &valid_form()).await;
        assert_eq!(outcome, SubmitOutcome::Rejected("Invalid input".to_string()));

        let screen = presenter.screen();
        assert_eq!(screen.error.as_deref(), Some("Invalid input"));
        assert_eq!(screen.mode, UiMode::Form);
        assert!(!screen.loading);
        assert_eq!(screen.loading_history, vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_error_without_message_uses_fallback() {
        let (client, _, presenter) =
            client_with(FakeScoring::new(Reply::Respond(ReportResponse::failure(None))));

        client.submit_report(&Session::default(), &valid_form()).await;
        assert_eq!(presenter.screen().error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_shows_connectivity_message() {
        let (client, _, presenter) = client_with(FakeScoring::new(Reply::Fail(
            TransportError::Request("connection refused".to_string()),
        )));

        let outcome = client.submit_report(&Session::default(), &valid_form()).await;
        assert!(matches!(outcome, SubmitOutcome::Unreachable(TransportError::Request(_))));

        let screen = presenter.screen();
        assert_eq!(screen.error.as_deref(), Some(CONNECTION_ERROR_MESSAGE));
        assert!(!screen.loading);
        assert_eq!(screen.mode, UiMode::Form);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_request_times_out() {
        let (client, _, presenter) = client_with(FakeScoring::new(Reply::Hang));

        let outcome = client.submit_report(&Session::default(), &valid_form()).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Unreachable(TransportError::Timeout(Duration::from_secs(30)))
        );
        assert_eq!(presenter.screen().error.as_deref(), Some(CONNECTION_ERROR_MESSAGE));
        assert!(!client.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_while_loading_is_busy() {
        let (client, scoring, presenter) = client_with(FakeScoring::new(Reply::Hang));

        let in_flight = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .submit_report(&Session::default(), &valid_form())
                    .await
            })
        };
        while !client.is_loading() {
            tokio::task::yield_now().await;
        }

        let outcome = client.submit_report(&Session::default(), &valid_form()).await;
        assert_eq!(outcome, SubmitOutcome::Busy);
        assert_eq!(scoring.calls(), 1);

        // Dropping the in-flight submission still leaves the loading state.
        in_flight.abort();
        assert!(in_flight.await.unwrap_err().is_cancelled());
        assert!(!client.is_loading());
        assert!(!presenter.screen().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_language_preference_is_sent() {
        let (client, scoring, presenter) = client_with(FakeScoring::new(Reply::Respond(
            ReportResponse::success(&sample_report(90.0)),
        )));
        let mut session = Session::default();

        client.set_language_preference(&mut session, Language::Gujarati);
        assert_eq!(session.language(), Language::Gujarati);
        assert_eq!(presenter.screen().language, Language::Gujarati);

        client.submit_report(&session, &valid_form()).await;
        let sent = scoring.last_input.lock().unwrap().expect("request sent");
        assert_eq!(sent.language, Language::Gujarati);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_report_returns_to_empty_form() {
        let (client, _, presenter) = client_with(FakeScoring::new(Reply::Respond(
            ReportResponse::success(&sample_report(85.0)),
        )));

        client.submit_report(&Session::default(), &valid_form()).await;
        client.show_error("stale banner");
        settle(Duration::from_millis(500)).await;
        assert!(client.is_animating());

        client.show_form();
        let frames_at_return = presenter.screen().score_frames;
        settle(Duration::from_secs(3)).await;

        let screen = presenter.screen();
        assert_eq!(screen.mode, UiMode::Form);
        assert_eq!(screen.error, None);
        assert_eq!(screen.resets, 1);
        assert_eq!(screen.scrolls.last(), Some(&Region::Form));
        assert_eq!(screen.score_frames, frames_at_return, "animation kept running");
        assert_eq!(client.mode(), UiMode::Form);
        assert!(client.current_report().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_banner_auto_dismisses() {
        let (client, _, presenter) =
            client_with(FakeScoring::new(Reply::Respond(ReportResponse::default())));

        client.show_error("first");
        assert_eq!(presenter.screen().scrolls.last(), Some(&Region::ErrorBanner));
        settle(Duration::from_secs(3)).await;
        assert_eq!(presenter.screen().error.as_deref(), Some("first"));

        client.show_error("second");
        settle(Duration::from_secs(3)).await;
        // The first banner's timer would have fired at t=5s.
        assert_eq!(presenter.screen().error.as_deref(), Some("second"));

        settle(Duration::from_secs(2) + Duration::from_millis(100)).await;
        assert_eq!(presenter.screen().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerender_restarts_animation() {
        let (client, _, presenter) =
            client_with(FakeScoring::new(Reply::Respond(ReportResponse::default())));

        client.render_results(&sample_report(80.0));
        settle(Duration::from_millis(400)).await;
        client.render_results(&sample_report(50.0));
        settle(Duration::from_secs(3)).await;

        let frame = presenter.screen().score.expect("score rendered");
        assert_eq!(frame.displayed, 50);
        assert_eq!(frame.tier, Tier::Alert);
        assert!(frame.finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_school_info_loading() {
        let mut scoring = FakeScoring::new(Reply::Hang);
        scoring.school = Some(SchoolInfo {
            name: "Primary School".to_string(),
            taluka: "Chikhli".to_string(),
            district: "Navsari".to_string(),
            dise_code: "24240108404".to_string(),
        });
        let (client, _, presenter) = client_with(scoring);
        client.load_school_info().await;
        assert_eq!(
            presenter.screen().school.as_ref().map(|s| s.name.as_str()),
            Some("Primary School")
        );

        let (client, _, presenter) = client_with(FakeScoring::new(Reply::Hang));
        client.load_school_info().await;
        assert!(presenter.screen().school.is_none());
    }
}
