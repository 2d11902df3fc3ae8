//! Background tasks that carry one selection through the submission pipeline.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::events::UserEvent;
use super::helpers::with_state_and_notify;
use super::proxy::EventProxy;
use super::selection::{self, PickedSource};
use super::state::AppState;
use crate::core::error::CoreError;
use crate::core::{
    build_archive, validate, AnalysisResult, HttpTransport, ProgressClock, Submitter, Transport,
};

/// Starts the pipeline for `source` against the configured analysis service.
pub fn start_submission<P: EventProxy>(
    source: PickedSource,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let api_url = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard.config.api_url.clone()
    };
    start_submission_with(source, HttpTransport::new(&api_url), proxy, state);
}

/// Starts the pipeline for `source` with an explicit transport.
///
/// Does nothing if another pipeline is still in flight. The lock is held
/// across the spawn, so the handle is stored before the task can finish.
pub fn start_submission_with<T, P>(
    source: PickedSource,
    transport: T,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) where
    T: Transport + 'static,
    P: EventProxy,
{
    let mut state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");
    if !state_guard.claim_pipeline() {
        tracing::warn!("Ignoring submission while another one is in flight.");
        return;
    }

    let proxy_clone = proxy.clone();
    let state_clone = state.clone();
    state_guard.pipeline_task = Some(tokio::spawn(async move {
        pipeline_task(source, transport, proxy_clone, state_clone).await;
    }));
}

/// The main pipeline task: read, validate, archive, submit, classify.
///
/// Stages run strictly in order. Whatever happens, the attempt ends in
/// `Reviewing` or `Failed` and the upload flag is released.
async fn pipeline_task<T: Transport, P: EventProxy>(
    source: PickedSource,
    transport: T,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let outcome = run_pipeline(source, transport, &proxy, &state).await;

    let reviewing = outcome.is_ok();
    match &outcome {
        Ok(result) => tracing::info!("Submission finished: {}", describe(result)),
        Err(e) => tracing::error!("Submission failed ({}): {}", e.kind(), e),
    }

    with_state_and_notify(&state, &proxy, |s| {
        s.finish(outcome.map_err(|e| e.to_string()));
    });
    if reviewing {
        proxy.send_event(UserEvent::ScrollToResults);
    }
}

async fn run_pipeline<T: Transport, P: EventProxy>(
    source: PickedSource,
    transport: T,
    proxy: &P,
    state: &Arc<Mutex<AppState>>,
) -> Result<AnalysisResult, CoreError> {
    let selection = selection::resolve(source).await?;
    tracing::info!(
        "Selection of {} files ({} bytes) acquired",
        selection.len(),
        selection.total_size()
    );

    let (timing, tick) = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        (state_guard.config.timing(), state_guard.config.progress_tick())
    };

    let selection = validate(selection).into_result()?;

    let started = Instant::now();
    with_state_and_notify(state, proxy, |s| s.start_upload());
    let ticker = spawn_progress_ticker(
        ProgressClock::starting_at(started, timing.progress_window),
        tick,
        proxy.clone(),
        state.clone(),
    );
    {
        let mut state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard.progress_task = Some(ticker);
    }

    let archive = build_archive(selection).await?;
    Submitter::new(transport, timing)
        .submit_since(archive, started)
        .await
}

/// Publishes the time-based progress until it reaches 100% or the upload ends.
fn spawn_progress_ticker<P: EventProxy>(
    clock: ProgressClock,
    tick: Duration,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            let fraction = clock.fraction();
            let still_uploading = {
                let mut state_guard = state
                    .lock()
                    .expect("Mutex was poisoned. This should not happen.");
                state_guard.set_progress(fraction)
            };
            if !still_uploading {
                break;
            }
            proxy.send_event(UserEvent::UploadProgress(fraction * 100.0));
            if fraction >= 1.0 {
                break;
            }
        }
    })
}

fn describe(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::Folder { overall, files } => format!(
            "project risk {} across {} files",
            overall.overall_danger,
            files.len()
        ),
        AnalysisResult::SingleFile(finding) => format!("file risk {}", finding.danger),
        AnalysisResult::Empty => "no findings".to_string(),
    }
}
