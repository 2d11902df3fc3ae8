//! The desktop-facing half of the application: state, IPC commands and the
//! background pipeline task.

pub mod commands;
pub mod events;
pub mod file_dialog;
pub mod helpers;
pub mod proxy;
pub mod selection;
pub mod state;
pub mod tasks;
pub mod view_model;

use std::sync::{Arc, Mutex};

use events::IpcMessage;
use file_dialog::DialogService;
use proxy::EventProxy;
use state::AppState;

#[cfg(feature = "desktop")]
use events::UserEvent;

/// Dispatches a raw IPC message from the WebView to its command handler.
pub fn handle_ipc_message<P: EventProxy, D: DialogService + ?Sized>(
    message: String,
    dialog: Arc<D>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let msg: IpcMessage = match serde_json::from_str(&message) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::error!("Failed to parse IPC message: {} ({})", e, message);
            return;
        }
    };
    tracing::debug!("IPC command received: {}", msg.command);

    match msg.command.as_str() {
        "initialize" => commands::initialize(proxy, state),
        "openChoice" => commands::open_choice(proxy, state),
        "uploadFolder" => commands::upload_folder(dialog.as_ref(), proxy, state),
        "uploadFiles" => commands::upload_files(dialog.as_ref(), proxy, state),
        "submitPaths" => commands::submit_paths(msg.payload, proxy, state),
        other => tracing::warn!("Unknown IPC command: {}", other),
    }
}

/// Forwards a backend event to the page by calling the matching `window.*` hook.
#[cfg(feature = "desktop")]
pub fn handle_user_event(event: UserEvent, webview: &wry::WebView) {
    let script = match event {
        UserEvent::StateUpdate(ui_state) => match serde_json::to_string(&ui_state) {
            Ok(json) => format!("window.updateState({json});"),
            Err(e) => {
                tracing::error!("Failed to serialize UI state: {}", e);
                return;
            }
        },
        UserEvent::UploadProgress(percent) => format!("window.updateProgress({percent:.1});"),
        UserEvent::ScrollToResults => "window.scrollToResults();".to_string(),
    };

    if let Err(e) = webview.evaluate_script(&script) {
        tracing::error!("Failed to evaluate script in WebView: {}", e);
    }
}
