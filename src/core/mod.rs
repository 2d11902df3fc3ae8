pub mod archiver;
pub mod classifier;
pub mod error;
pub mod submission;
pub mod traversal;
pub mod validator;

use error::CoreError;

/// A single file that is part of a submission.
///
/// `relative_path` always uses `/` separators. Entries are immutable once
/// produced by the traversal engine or the selection adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    relative_path: String,
    content: Vec<u8>,
}

impl FileEntry {
    pub fn new(relative_path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content,
        }
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// The ordered, non-empty list of files chosen by one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<FileEntry>,
}

impl Selection {
    /// Wraps the entries of one user action. An empty list is rejected.
    pub fn new(entries: Vec<FileEntry>) -> Result<Self, CoreError> {
        if entries.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(FileEntry::size).sum()
    }
}

pub use archiver::{build_archive, ArchiveBlob};
pub use classifier::{classify, AnalysisResult, DangerLevel, FileFinding, OverallAnalysis};
pub use submission::{HttpTransport, ProgressClock, Submitter, SubmissionTiming, Transport};
pub use traversal::{collect_files, DirectoryHandle, FileHandle, FsDirectory, FsFile};
pub use validator::{validate, ValidationOutcome};
