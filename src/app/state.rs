//! Defines the central, mutable state of the application.

use crate::config::AppConfig;
use crate::core::AnalysisResult;
use tokio::task::JoinHandle;

/// Where the single submission of this session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Choosing,
    Uploading { progress: f64 },
    Reviewing(AnalysisResult),
    Failed(String),
}

impl SubmissionState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, SubmissionState::Uploading { .. })
    }
}

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` to allow for safe, shared access
/// from the main event loop, IPC handlers, and async tasks. Pipeline stages
/// replace `submission` as a whole, so no half-updated state is ever observable.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// The one submission state of this session.
    pub submission: SubmissionState,
    /// `true` while the UI must show the generic path-entry control.
    pub manual_selection: bool,
    /// Set when a pipeline is spawned and cleared only by [`AppState::finish`].
    pub in_flight: bool,
    /// A handle to the running pipeline task.
    pub pipeline_task: Option<JoinHandle<()>>,
    /// A handle to the task animating the progress indicator.
    pub progress_task: Option<JoinHandle<()>>,
}

impl Default for AppState {
    /// Creates a default `AppState` instance, resolving the configuration.
    fn default() -> Self {
        Self::with_config(AppConfig::load().unwrap_or_default())
    }
}

impl AppState {
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            submission: SubmissionState::Idle,
            manual_selection: false,
            in_flight: false,
            pipeline_task: None,
            progress_task: None,
        }
    }

    /// `true` from the moment a pipeline is claimed until it reaches a
    /// terminal state.
    pub fn is_busy(&self) -> bool {
        self.in_flight || self.submission.is_uploading()
    }

    /// Marks a pipeline as running. Returns `false` if one already is.
    pub fn claim_pipeline(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Enters `Choosing`, clearing any previous result or error.
    ///
    /// Returns `false` and leaves the state untouched while a selection is in flight.
    pub fn begin_choice(&mut self) -> bool {
        if self.is_busy() {
            tracing::warn!("Ignoring new selection while a submission is in progress.");
            return false;
        }
        self.submission = SubmissionState::Choosing;
        self.manual_selection = false;
        true
    }

    /// Enters `Uploading` at 0% progress.
    pub fn start_upload(&mut self) {
        self.manual_selection = false;
        self.submission = SubmissionState::Uploading { progress: 0.0 };
    }

    /// Advances the progress indicator. Ignored outside `Uploading`, and the
    /// indicator never moves backwards.
    pub fn set_progress(&mut self, fraction: f64) -> bool {
        match &mut self.submission {
            SubmissionState::Uploading { progress } => {
                let clamped = fraction.clamp(0.0, 1.0);
                if clamped > *progress {
                    *progress = clamped;
                }
                true
            }
            _ => false,
        }
    }

    /// Records the terminal outcome of an attempt and releases the upload.
    pub fn finish(&mut self, outcome: Result<AnalysisResult, String>) {
        self.manual_selection = false;
        self.submission = match outcome {
            Ok(result) => SubmissionState::Reviewing(result),
            Err(message) => SubmissionState::Failed(message),
        };
        self.in_flight = false;
        self.pipeline_task = None;
        if let Some(handle) = self.progress_task.take() {
            handle.abort();
        }
    }
}
