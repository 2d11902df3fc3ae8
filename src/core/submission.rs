//! Sends an archive to the analysis service and enforces the UX timing rules.

use super::archiver::ArchiveBlob;
use super::classifier::{classify_body, AnalysisResult};
use super::error::CoreError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tokio::time::Instant;

/// Multipart field name the service reads the upload from.
pub const UPLOAD_FIELD: &str = "file";
/// Synthetic file name attached to every archive upload.
pub const ARCHIVE_FILE_NAME: &str = "upload.zip";
/// Path of the analysis endpoint, relative to the API base URL.
pub const ANALYZE_PATH: &str = "/analyze-upload/";

/// Delivers an archive to the remote service and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, archive: ArchiveBlob) -> Result<Vec<u8>, CoreError>;
}

/// The production transport: a multipart POST over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport for `{api_url}/analyze-upload/`.
    pub fn new(api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), ANALYZE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, archive: ArchiveBlob) -> Result<Vec<u8>, CoreError> {
        let mime = mime_guess::from_path(ARCHIVE_FILE_NAME).first_or_octet_stream();
        let part = Part::bytes(archive.into_bytes())
            .file_name(ARCHIVE_FILE_NAME)
            .mime_str(mime.essence_str())?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::info!("POST {}", self.endpoint);
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Server {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// The two independent timers of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTiming {
    /// Results are not surfaced before this much time has passed.
    pub minimum_duration: Duration,
    /// Time the progress indicator takes to go from 0% to 100%.
    pub progress_window: Duration,
}

impl Default for SubmissionTiming {
    fn default() -> Self {
        Self {
            minimum_duration: Duration::from_secs(15),
            progress_window: Duration::from_secs(20),
        }
    }
}

/// Linear, purely time-based progress, independent of the network.
#[derive(Debug, Clone, Copy)]
pub struct ProgressClock {
    started: Instant,
    window: Duration,
}

impl ProgressClock {
    pub fn start(window: Duration) -> Self {
        Self::starting_at(Instant::now(), window)
    }

    pub fn starting_at(started: Instant, window: Duration) -> Self {
        Self { started, window }
    }

    /// Fraction in `[0, 1]` at `now`. Saturates at 1 and never goes back.
    pub fn fraction_at(&self, now: Instant) -> f64 {
        if self.window.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.window.as_secs_f64()).min(1.0)
    }

    pub fn fraction(&self) -> f64 {
        self.fraction_at(Instant::now())
    }
}

/// Drives one archive through a [`Transport`] and classifies the answer.
pub struct Submitter<T: Transport> {
    transport: T,
    timing: SubmissionTiming,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: T, timing: SubmissionTiming) -> Self {
        Self { transport, timing }
    }

    pub fn timing(&self) -> SubmissionTiming {
        self.timing
    }

    /// Submits `archive`, counting the minimum duration from now.
    pub async fn submit(&self, archive: ArchiveBlob) -> Result<AnalysisResult, CoreError> {
        self.submit_since(archive, Instant::now()).await
    }

    /// Submits `archive`, counting the minimum duration from `started`.
    ///
    /// A successful result is held back until `started + minimum_duration`.
    /// Failures are returned as soon as they happen.
    pub async fn submit_since(
        &self,
        archive: ArchiveBlob,
        started: Instant,
    ) -> Result<AnalysisResult, CoreError> {
        let entries = archive.entry_count();
        let body = self.transport.send(archive).await?;
        let result = classify_body(&body)?;

        let ready_at = started + self.timing.minimum_duration;
        if Instant::now() < ready_at {
            tracing::debug!(
                "Response ready after {:?}; holding until the minimum duration",
                started.elapsed()
            );
            tokio::time::sleep_until(ready_at).await;
        }

        tracing::info!(
            "Analysis of {} entries completed in {:?}",
            entries,
            started.elapsed()
        );
        Ok(result)
    }
}
