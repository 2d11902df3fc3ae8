//! Recursive collection of a directory handle into a flat list of files.
//!
//! Entry order is whatever the underlying directory enumeration yields and
//! differs between platforms. Nothing downstream depends on it.

use super::error::CoreError;
use super::FileEntry;
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// A readable file obtained from a picker or from a directory listing.
#[async_trait]
pub trait FileHandle: Send + Sync {
    fn name(&self) -> &str;

    async fn read(&self) -> Result<Vec<u8>, CoreError>;
}

/// One child of a directory, as returned by [`DirectoryHandle::entries`].
pub enum HandleEntry {
    File(Box<dyn FileHandle>),
    Directory(Box<dyn DirectoryHandle>),
}

/// A directory that can enumerate its direct children.
#[async_trait]
pub trait DirectoryHandle: Send + Sync {
    fn name(&self) -> &str;

    async fn entries(&self) -> Result<Vec<HandleEntry>, CoreError>;
}

/// A file on the local file system.
#[derive(Debug, Clone)]
pub struct FsFile {
    path: PathBuf,
    name: String,
}

impl FsFile {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let name = utf8_file_name(&path)?;
        Ok(Self { path, name })
    }
}

#[async_trait]
impl FileHandle for FsFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Vec<u8>, CoreError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| CoreError::Io(e, self.path.clone()))
    }
}

/// A directory on the local file system. Symbolic links are not followed.
#[derive(Debug, Clone)]
pub struct FsDirectory {
    path: PathBuf,
    name: String,
}

impl FsDirectory {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let name = utf8_file_name(&path)?;
        Ok(Self { path, name })
    }
}

#[async_trait]
impl DirectoryHandle for FsDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn entries(&self) -> Result<Vec<HandleEntry>, CoreError> {
        let mut read_dir = tokio::fs::read_dir(&self.path)
            .await
            .map_err(|e| CoreError::Io(e, self.path.clone()))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| CoreError::Io(e, self.path.clone()))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| CoreError::Io(e, path.clone()))?;

            if file_type.is_file() {
                entries.push(HandleEntry::File(Box::new(FsFile::open(path)?)));
            } else if file_type.is_dir() {
                entries.push(HandleEntry::Directory(Box::new(FsDirectory::open(path)?)));
            } else {
                tracing::debug!("Skipping non-regular entry {}", path.display());
            }
        }
        Ok(entries)
    }
}

fn utf8_file_name(path: &Path) -> Result<String, CoreError> {
    let utf8 = Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(CoreError::NonUtf8Path)?;
    Ok(utf8
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| utf8.to_string()))
}

/// Walks `dir` depth-first and reads every file it transitively contains.
///
/// Each relative path is `root` followed by the path segments joined by `/`.
/// Files are read one at a time, in enumeration order. Any failure abandons
/// the whole walk; partial results are never returned.
pub async fn collect_files(
    dir: &dyn DirectoryHandle,
    root: &str,
) -> Result<Vec<FileEntry>, CoreError> {
    let mut files = Vec::new();
    walk(dir, root.to_string(), &mut files).await?;
    tracing::info!("Collected {} files from '{}'", files.len(), dir.name());
    Ok(files)
}

fn walk<'a>(
    dir: &'a dyn DirectoryHandle,
    root: String,
    out: &'a mut Vec<FileEntry>,
) -> Pin<Box<dyn Future<Output = Result<(), CoreError>> + Send + 'a>> {
    Box::pin(async move {
        for entry in dir.entries().await? {
            match entry {
                HandleEntry::File(file) => {
                    let content = file.read().await?;
                    out.push(FileEntry::new(format!("{root}{}", file.name()), content));
                }
                HandleEntry::Directory(sub) => {
                    let prefix = format!("{root}{}/", sub.name());
                    walk(sub.as_ref(), prefix, out).await?;
                }
            }
        }
        Ok(())
    })
}
