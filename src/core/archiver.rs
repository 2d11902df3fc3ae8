//! Serializes a validated selection into a single ZIP container.
//!
//! Entries are stored uncompressed so the output is byte-for-byte
//! deterministic for a fixed entry order.

use super::error::CoreError;
use super::Selection;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// The archive payload for exactly one submission.
///
/// Not `Clone`: it is created once and consumed by the transport.
#[derive(Debug)]
pub struct ArchiveBlob {
    bytes: Vec<u8>,
    entry_count: usize,
}

impl ArchiveBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builds the archive on the blocking pool.
pub async fn build_archive(selection: Selection) -> Result<ArchiveBlob, CoreError> {
    tokio::task::spawn_blocking(move || write_archive(&selection)).await?
}

/// Writes every entry of `selection` at its exact relative path.
///
/// When two entries share a path the later content wins, but the entry
/// keeps the position of its first occurrence.
pub fn write_archive(selection: &Selection) -> Result<ArchiveBlob, CoreError> {
    let mut order: Vec<&str> = Vec::with_capacity(selection.len());
    let mut latest: HashMap<&str, &[u8]> = HashMap::with_capacity(selection.len());
    for entry in selection.entries() {
        let path = entry.relative_path();
        if latest.insert(path, entry.content()).is_some() {
            tracing::warn!("Duplicate path '{}' in selection; last file wins", path);
        } else {
            order.push(path);
        }
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for path in &order {
        zip.start_file(*path, options)?;
        zip.write_all(latest[path])
            .map_err(|e| CoreError::Archive(format!("failed to write '{path}': {e}")))?;
    }
    let bytes = zip.finish()?.into_inner();

    tracing::info!(
        "Built archive with {} entries ({} bytes)",
        order.len(),
        bytes.len()
    );
    Ok(ArchiveBlob {
        bytes,
        entry_count: order.len(),
    })
}
