//! An abstraction layer for native file dialogs to enable testing.

use std::path::PathBuf;

/// Which native pickers the platform can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerCapabilities {
    pub directory: bool,
    pub multi_file: bool,
}

impl PickerCapabilities {
    pub const ALL: Self = Self {
        directory: true,
        multi_file: true,
    };
    pub const NONE: Self = Self {
        directory: false,
        multi_file: false,
    };
}

/// Defines a common interface for file and folder selection dialogs.
/// This allows for a mock implementation during tests, avoiding the need
/// to interact with actual OS dialog windows.
pub trait DialogService: Send + Sync {
    /// Reports which pickers can be shown right now.
    fn capabilities(&self) -> PickerCapabilities;

    /// Opens a dialog to select a single directory.
    fn pick_directory(&self) -> Option<PathBuf>;

    /// Opens a dialog to select one or more files.
    fn pick_files(&self) -> Option<Vec<PathBuf>>;
}

/// The production implementation that uses the `rfd` crate to show native OS dialogs.
pub struct NativeDialogService;

impl DialogService for NativeDialogService {
    fn capabilities(&self) -> PickerCapabilities {
        if display_available() {
            PickerCapabilities::ALL
        } else {
            tracing::info!("No display server found; native pickers unavailable.");
            PickerCapabilities::NONE
        }
    }

    fn pick_directory(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Upload Folder")
            .pick_folder()
    }

    fn pick_files(&self) -> Option<Vec<PathBuf>> {
        rfd::FileDialog::new()
            .set_title("Upload File(s)")
            .pick_files()
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn display_available() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn display_available() -> bool {
    true
}
