// src/app/commands.rs
//! Contains all the command handlers that are callable from the frontend via IPC.
//!
//! Each function in this module corresponds to a specific `IpcMessage::command`.
//! These handlers are responsible for interacting with the `AppState` and the
//! selection adapter, and for sending `UserEvent`s back to the UI.

use super::events::UserEvent;
use super::helpers::with_state_and_notify;
use super::proxy::EventProxy;
use super::selection::{self, Acquisition, SelectionIntent};
use super::state::AppState;
use super::tasks::start_submission;
use super::view_model::generate_ui_state;
use crate::app::file_dialog::DialogService;
use crate::core::error::CoreError;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

/// Handles the initial request for state from the frontend when it loads.
pub fn initialize<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let state_guard = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.");
    let event = UserEvent::StateUpdate(Box::new(generate_ui_state(&state_guard)));
    proxy.send_event(event);
}

/// Reveals the folder/file choice. Clears any previous result or error.
pub fn open_choice<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.begin_choice();
    });
}

/// Opens the folder picker (or its fallback) and submits the result.
pub fn upload_folder<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    upload(dialog, SelectionIntent::Folder, proxy, state);
}

/// Opens the multi-file picker (or its fallback) and submits the result.
pub fn upload_files<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    upload(dialog, SelectionIntent::Files, proxy, state);
}

fn upload<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    intent: SelectionIntent,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if !with_state_and_notify(&state, &proxy, |s| s.begin_choice()) {
        return;
    }

    match selection::acquire(dialog, intent) {
        Ok(Acquisition::Picked(source)) => start_submission(source, proxy, state),
        Ok(Acquisition::NeedsManualEntry) => {
            tracing::info!("No native picker available; asking for paths instead.");
            with_state_and_notify(&state, &proxy, |s| s.manual_selection = true);
        }
        Err(e) => fail(e, &proxy, &state),
    }
}

#[derive(Deserialize, Debug, Default)]
struct SubmitPathsPayload {
    #[serde(default)]
    paths: Vec<String>,
}

/// Submits the paths typed into the fallback control.
pub fn submit_paths<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let payload: SubmitPathsPayload = match serde_json::from_value(payload) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Malformed submitPaths payload: {}", e);
            SubmitPathsPayload::default()
        }
    };

    if !with_state_and_notify(&state, &proxy, |s| s.begin_choice()) {
        return;
    }

    start_submission(selection::manual_source(&payload.paths), proxy, state);
}

fn fail<P: EventProxy>(error: CoreError, proxy: &P, state: &Arc<Mutex<AppState>>) {
    tracing::info!("Selection ended without files ({}): {}", error.kind(), error);
    with_state_and_notify(state, proxy, |s| s.finish(Err(error.to_string())));
}
