//! Normalizes the three ways of choosing input into one flat [`Selection`].
//!
//! The strategy is picked from the caller's intent and from what the
//! platform can actually show:
//!
//! 1. `DirectoryHandle`: a native folder picker, then a recursive walk.
//! 2. `MultiFile`: a native multi-file picker, resolved flat.
//! 3. `Fallback`: a generic path-entry control in the UI, resolved flat.

use super::file_dialog::{DialogService, PickerCapabilities};
use crate::core::error::CoreError;
use crate::core::traversal::{collect_files, FileHandle, FsDirectory, FsFile};
use crate::core::{FileEntry, Selection};
use std::path::PathBuf;

/// What the user asked to upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIntent {
    Folder,
    Files,
}

/// How the selection will be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    DirectoryHandle,
    MultiFile,
    Fallback,
}

impl SelectionStrategy {
    /// A folder intent without a folder picker falls through to the
    /// multi-file picker, and then to the fallback control.
    pub fn for_intent(intent: SelectionIntent, caps: PickerCapabilities) -> Self {
        match intent {
            SelectionIntent::Folder if caps.directory => SelectionStrategy::DirectoryHandle,
            _ if caps.multi_file => SelectionStrategy::MultiFile,
            _ => SelectionStrategy::Fallback,
        }
    }
}

/// A picker result whose file contents have not been read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedSource {
    Directory(PathBuf),
    Files(Vec<PathBuf>),
}

/// The outcome of running a strategy's picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Picked(PickedSource),
    /// The UI has to show the generic path-entry control.
    NeedsManualEntry,
}

/// Runs the picker for `intent`. A cancelled dialog is a selection error.
pub fn acquire<D: DialogService + ?Sized>(
    dialog: &D,
    intent: SelectionIntent,
) -> Result<Acquisition, CoreError> {
    let strategy = SelectionStrategy::for_intent(intent, dialog.capabilities());
    tracing::info!("Acquiring {:?} selection via {:?}", intent, strategy);

    match strategy {
        SelectionStrategy::DirectoryHandle => dialog
            .pick_directory()
            .map(|dir| Acquisition::Picked(PickedSource::Directory(dir)))
            .ok_or(CoreError::SelectionCancelled),
        SelectionStrategy::MultiFile => dialog
            .pick_files()
            .map(|files| Acquisition::Picked(PickedSource::Files(files)))
            .ok_or(CoreError::SelectionCancelled),
        SelectionStrategy::Fallback => Ok(Acquisition::NeedsManualEntry),
    }
}

/// Builds a flat source from the paths typed into the fallback control.
pub fn manual_source(paths: &[String]) -> PickedSource {
    PickedSource::Files(
        paths
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect(),
    )
}

/// Reads every file of `source` into a [`Selection`].
///
/// Directories are walked with an empty root prefix. Flat sources use the
/// bare file name as the relative path. Any unreadable file fails the whole
/// attempt.
pub async fn resolve(source: PickedSource) -> Result<Selection, CoreError> {
    let entries = match source {
        PickedSource::Directory(path) => {
            let dir = FsDirectory::open(path)?;
            collect_files(&dir, "").await?
        }
        PickedSource::Files(paths) => {
            let mut entries = Vec::with_capacity(paths.len());
            for path in paths {
                let file = FsFile::open(path)?;
                let content = file.read().await?;
                entries.push(FileEntry::new(file.name(), content));
            }
            entries
        }
    };
    Selection::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct ScriptedDialog {
        caps: PickerCapabilities,
        directory: Option<PathBuf>,
        files: Option<Vec<PathBuf>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedDialog {
        fn new(caps: PickerCapabilities) -> Self {
            Self {
                caps,
                directory: None,
                files: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl DialogService for ScriptedDialog {
        fn capabilities(&self) -> PickerCapabilities {
            self.caps
        }
        fn pick_directory(&self) -> Option<PathBuf> {
            self.calls.lock().unwrap().push("directory");
            self.directory.clone()
        }
        fn pick_files(&self) -> Option<Vec<PathBuf>> {
            self.calls.lock().unwrap().push("files");
            self.files.clone()
        }
    }

    #[test]
    fn test_strategy_selection() {
        use SelectionIntent::*;
        use SelectionStrategy::*;
        let files_only = PickerCapabilities {
            directory: false,
            multi_file: true,
        };

        assert_eq!(SelectionStrategy::for_intent(Folder, PickerCapabilities::ALL), DirectoryHandle);
        assert_eq!(SelectionStrategy::for_intent(Files, PickerCapabilities::ALL), MultiFile);
        assert_eq!(SelectionStrategy::for_intent(Folder, files_only), MultiFile);
        assert_eq!(SelectionStrategy::for_intent(Folder, PickerCapabilities::NONE), Fallback);
        assert_eq!(SelectionStrategy::for_intent(Files, PickerCapabilities::NONE), Fallback);
    }

    #[test]
    fn test_cancelled_picker_is_selection_error() {
        let dialog = ScriptedDialog::new(PickerCapabilities::ALL);
        let result = acquire(&dialog, SelectionIntent::Folder);
        assert!(matches!(result, Err(CoreError::SelectionCancelled)));
        assert_eq!(*dialog.calls.lock().unwrap(), vec!["directory"]);
    }

    #[test]
    fn test_fallback_never_opens_a_dialog() {
        let dialog = ScriptedDialog::new(PickerCapabilities::NONE);
        let result = acquire(&dialog, SelectionIntent::Files).unwrap();
        assert_eq!(result, Acquisition::NeedsManualEntry);
        assert!(dialog.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_multi_file_pick() {
        let mut dialog = ScriptedDialog::new(PickerCapabilities::ALL);
        dialog.files = Some(vec![PathBuf::from("/tmp/a.py")]);
        let result = acquire(&dialog, SelectionIntent::Files).unwrap();
        assert_eq!(
            result,
            Acquisition::Picked(PickedSource::Files(vec![PathBuf::from("/tmp/a.py")]))
        );
    }

    #[test]
    fn test_manual_source_drops_blank_lines() {
        let source = manual_source(&["  /a/b.py ".to_string(), "".to_string(), "   ".to_string()]);
        assert_eq!(source, PickedSource::Files(vec![PathBuf::from("/a/b.py")]));
    }

    #[tokio::test]
    async fn test_resolve_flat_files_use_bare_names() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/one.py"), "1").unwrap();
        fs::write(dir.path().join("two.js"), "2").unwrap();

        let selection = resolve(PickedSource::Files(vec![
            dir.path().join("nested/one.py"),
            dir.path().join("two.js"),
        ]))
        .await
        .unwrap();

        let paths: Vec<_> = selection.entries().iter().map(|e| e.relative_path()).collect();
        assert_eq!(paths, vec!["one.py", "two.js"]);
    }

    #[tokio::test]
    async fn test_resolve_directory_walks_recursively() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.go"), "package main").unwrap();

        let selection = resolve(PickedSource::Directory(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(selection.entries()[0].relative_path(), "src/main.go");
    }

    #[tokio::test]
    async fn test_resolve_empty_sources_are_empty_selection() {
        let dir = tempdir().unwrap();
        let empty_dir = resolve(PickedSource::Directory(dir.path().to_path_buf())).await;
        assert!(matches!(empty_dir, Err(CoreError::EmptySelection)));

        let no_files = resolve(PickedSource::Files(Vec::new())).await;
        assert!(matches!(no_files, Err(CoreError::EmptySelection)));
    }

    #[tokio::test]
    async fn test_resolve_unreadable_file_fails_attempt() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ok.py"), "x").unwrap();
        let result = resolve(PickedSource::Files(vec![
            dir.path().join("ok.py"),
            dir.path().join("missing.py"),
        ]))
        .await;
        assert!(matches!(result, Err(CoreError::Io(..))));
    }
}
