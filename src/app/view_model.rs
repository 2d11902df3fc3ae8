//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! This module is the renderer of the pipeline: it turns the submission state
//! and a classified analysis result into exactly what the page draws.

use crate::core::validator::ALLOWED_EXTENSIONS;
use crate::core::{AnalysisResult, FileFinding};
use serde::Serialize;

use super::state::{AppState, SubmissionState};

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct UiState {
    /// One of `idle`, `choosing`, `uploading`, `reviewing`, `failed`.
    pub phase: &'static str,
    /// `false` while a selection is in flight; the choice buttons are disabled.
    pub can_choose: bool,
    pub show_choice: bool,
    pub manual_selection: bool,
    pub progress_percent: f64,
    pub error: Option<String>,
    pub report: Option<ReportView>,
    /// `ext (Language)` labels for the file picker hint.
    pub allowed_extensions: Vec<String>,
}

/// The rendered analysis result.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportView {
    Folder {
        overall_danger: String,
        overall_reason: String,
        files: Vec<FileView>,
    },
    Single {
        danger: String,
        code: String,
        reason: String,
    },
    Empty {
        message: String,
    },
}

/// One collapsible entry of the per-file list.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FileView {
    /// `{filename} — Risk: {DANGER}`
    pub summary: String,
    pub filename: String,
    pub danger: String,
    pub code: String,
    pub reason: String,
}

impl From<&FileFinding> for FileView {
    fn from(finding: &FileFinding) -> Self {
        let filename = finding.filename.clone().unwrap_or_default();
        let danger = finding.danger.label();
        Self {
            summary: format!("{filename} — Risk: {danger}"),
            filename,
            danger,
            code: finding.code.clone(),
            reason: finding.reason.clone(),
        }
    }
}

/// Renders a classified result. Per-file items keep the service's order.
pub fn render_report(result: &AnalysisResult) -> ReportView {
    match result {
        AnalysisResult::Folder { overall, files } => ReportView::Folder {
            overall_danger: overall.overall_danger.label(),
            overall_reason: overall.overall_reason.clone(),
            files: files.iter().map(FileView::from).collect(),
        },
        AnalysisResult::SingleFile(finding) => ReportView::Single {
            danger: finding.danger.label(),
            code: finding.code.clone(),
            reason: finding.reason.clone(),
        },
        AnalysisResult::Empty => ReportView::Empty {
            message: "The analysis service returned no findings.".to_string(),
        },
    }
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let (phase, progress_percent, error, report) = match &state.submission {
        SubmissionState::Idle => ("idle", 0.0, None, None),
        SubmissionState::Choosing => ("choosing", 0.0, None, None),
        SubmissionState::Uploading { progress } => ("uploading", progress * 100.0, None, None),
        SubmissionState::Reviewing(result) => {
            ("reviewing", 100.0, None, Some(render_report(result)))
        }
        SubmissionState::Failed(message) => ("failed", 0.0, Some(message.clone()), None),
    };

    let allowed_extensions = ALLOWED_EXTENSIONS
        .iter()
        .map(|(ext, language)| format!(".{ext} ({language})"))
        .collect();

    UiState {
        phase,
        can_choose: !state.is_busy(),
        show_choice: matches!(state.submission, SubmissionState::Choosing),
        manual_selection: state.manual_selection,
        progress_percent,
        error,
        report,
        allowed_extensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::{DangerLevel, OverallAnalysis};

    fn finding(name: Option<&str>, danger: &str) -> FileFinding {
        FileFinding {
            filename: name.map(String::from),
            danger: DangerLevel::from(danger.to_string()),
            code: "eval(x)".into(),
            reason: "eval()".into(),
        }
    }

    #[test]
    fn test_render_single_file() {
        let view = render_report(&AnalysisResult::SingleFile(finding(Some("a.py"), "low")));
        assert_eq!(
            view,
            ReportView::Single {
                danger: "LOW".into(),
                code: "eval(x)".into(),
                reason: "eval()".into(),
            }
        );
    }

    #[test]
    fn test_render_folder() {
        let view = render_report(&AnalysisResult::Folder {
            overall: OverallAnalysis {
                overall_danger: DangerLevel::High,
                overall_reason: "eval use".into(),
            },
            files: vec![finding(Some("proj/b.js"), "high"), finding(Some("proj/a.py"), "yes")],
        });
        let ReportView::Folder { overall_danger, files, .. } = view else {
            panic!("expected folder view");
        };
        assert_eq!(overall_danger, "HIGH");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].summary, "proj/b.js — Risk: HIGH");
        assert_eq!(files[1].danger, "YES");
    }

    #[test]
    fn test_ui_state_phases() {
        let mut state = AppState::with_config(AppConfig::default());
        let ui = generate_ui_state(&state);
        assert_eq!(ui.phase, "idle");
        assert!(ui.can_choose);
        assert!(!ui.show_choice);
        assert_eq!(ui.allowed_extensions[0], ".py (Python)");

        state.begin_choice();
        assert!(generate_ui_state(&state).show_choice);

        state.start_upload();
        state.set_progress(0.5);
        let ui = generate_ui_state(&state);
        assert_eq!(ui.phase, "uploading");
        assert!(!ui.can_choose);
        assert_eq!(ui.progress_percent, 50.0);

        state.finish(Err("No files selected".into()));
        let ui = generate_ui_state(&state);
        assert_eq!(ui.phase, "failed");
        assert_eq!(ui.error.as_deref(), Some("No files selected"));
        assert!(ui.report.is_none());
    }

    #[test]
    fn test_serialized_report_is_tagged() {
        let view = render_report(&AnalysisResult::Empty);
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["kind"], "empty");
    }
}
