//! Timer-driven background tasks owned by the report client.
//!
//! Each kind of task lives in a [`TaskSlot`]: at most one instance runs at a
//! time, and starting a new one aborts the old.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;

use crate::domain::{ScoreAnimation, FRAME_INTERVAL};
use crate::ports::Presenter;

/// Holder for a single cancellable task.
#[derive(Debug, Default)]
pub(crate) struct TaskSlot {
    current: Mutex<Option<AbortHandle>>,
}

impl TaskSlot {
    /// Install `handle`, aborting whatever was running before.
    pub(crate) fn replace(&self, handle: JoinHandle<()>) {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Abort the running task, if any. Returns whether one was still running.
    pub(crate) fn cancel(&self) -> bool {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match previous {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Generation counter of the error banner.
///
/// Showing, clearing and timed dismissal each run under this lock, so a
/// dismissal never hides a banner shown after its generation check.
#[derive(Debug, Default)]
pub(crate) struct BannerGeneration {
    current: Mutex<u64>,
}

impl BannerGeneration {
    /// Start a new generation and run `f` with it while the lock is held.
    pub(crate) fn advance<R>(&self, f: impl FnOnce(u64) -> R) -> R {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += 1;
        f(*current)
    }

    /// Run `f` only if `generation` is still current. Returns whether it ran.
    pub(crate) fn if_current(&self, generation: u64, f: impl FnOnce()) -> bool {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == generation {
            f();
            true
        } else {
            false
        }
    }
}

/// Drive a score animation to completion, one frame per [`FRAME_INTERVAL`].
pub(crate) async fn run_score_animation<P: Presenter>(
    presenter: Arc<P>,
    mut animation: ScoreAnimation,
) {
    presenter.render_score(animation.initial_frame());

    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately; frames start one interval in.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let frame = animation.advance();
        presenter.render_score(frame);
        if frame.finished {
            tracing::trace!(score = frame.displayed, "Score animation finished");
            break;
        }
    }
}

/// Hide the error banner after `delay`, unless a newer error was shown since.
pub(crate) async fn dismiss_error_after<P: Presenter>(
    presenter: Arc<P>,
    delay: Duration,
    banner: Arc<BannerGeneration>,
    shown_at_generation: u64,
) {
    tokio::time::sleep(delay).await;
    if !banner.if_current(shown_at_generation, || presenter.hide_error()) {
        tracing::trace!("Stale error dismissal skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Language, UiMode};
    use crate::ports::{Region, ReportView};

    #[derive(Default)]
    struct BannerPresenter {
        error: Mutex<Option<String>>,
    }

    impl BannerPresenter {
        fn error(&self) -> Option<String> {
            self.error.lock().unwrap().clone()
        }
    }

    impl Presenter for BannerPresenter {
        fn show_mode(&self, _mode: UiMode) {}
        fn set_loading(&self, _loading: bool) {}
        fn show_error(&self, message: &str) {
            *self.error.lock().unwrap() = Some(message.to_string());
        }
        fn hide_error(&self) {
            *self.error.lock().unwrap() = None;
        }
        fn render_score(&self, _frame: crate::domain::ScoreFrame) {}
        fn render_report(&self, _view: &ReportView) {}
        fn set_language(&self, _language: Language) {}
        fn reset_form(&self) {}
        fn scroll_into_view(&self, _region: Region) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissal_hides_current_banner() {
        let presenter = Arc::new(BannerPresenter::default());
        let banner = Arc::new(BannerGeneration::default());
        let shown = banner.advance(|generation| {
            presenter.show_error("Please select your gender");
            generation
        });

        dismiss_error_after(presenter.clone(), Duration::from_secs(5), banner, shown).await;
        assert_eq!(presenter.error(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dismissal_never_hides_banner_shown_during_check() {
        let presenter = Arc::new(BannerPresenter::default());
        let banner = Arc::new(BannerGeneration::default());
        let first = banner.advance(|generation| {
            presenter.show_error("first");
            generation
        });

        // The old timer fires while a newer banner is being shown.
        let dismissal = banner.advance(|_| {
            let handle = tokio::spawn(dismiss_error_after(
                presenter.clone(),
                Duration::ZERO,
                banner.clone(),
                first,
            ));
            std::thread::sleep(Duration::from_millis(50));
            presenter.show_error("second");
            handle
        });

        dismissal.await.expect("dismissal task completes");
        assert_eq!(presenter.error().as_deref(), Some("second"));
    }
}
