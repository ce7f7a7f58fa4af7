//! Deferred persistence and conversion of accepted uploads.
//!
//! Upload responses return as soon as the metadata transition commits;
//! the payload bytes and the WebP conversion are handed to a bounded
//! flume queue and processed by a background worker task. The worker is
//! where deferred failures become observable: every failed job is
//! logged, and the published record is left in place (a later fetch of
//! an unconverted image sees NotFound).

use futures::StreamExt;

use crate::blobs::BlobStore;
use crate::convert;

/// Queued uploads beyond this start failing with [`QueueError::Full`].
const DEFAULT_QUEUE_SIZE: usize = 1000;

/// A unit of deferred work: persist the original, then convert it.
#[derive(Debug)]
pub struct UploadJob {
    pub file_name: String,
    pub payload: Vec<u8>,
}

/// Sending half of the upload queue, held by the service state.
#[derive(Debug, Clone)]
pub struct UploadQueue {
    tx: flume::Sender<UploadJob>,
}

impl UploadQueue {
    /// Create the queue. The receiver must be passed to [`run_worker`].
    pub fn new() -> (Self, JobReceiver) {
        Self::with_capacity(DEFAULT_QUEUE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> (Self, JobReceiver) {
        let (tx, rx) = flume::bounded(capacity);
        (Self { tx }, JobReceiver { rx })
    }

    /// Queue a job without waiting. Fails when the queue is full or the
    /// worker is gone; the caller surfaces that instead of losing the
    /// job silently.
    pub fn enqueue(&self, job: UploadJob) -> Result<(), QueueError> {
        self.tx.try_send(job).map_err(|e| match e {
            flume::TrySendError::Full(_) => QueueError::Full,
            flume::TrySendError::Disconnected(_) => QueueError::WorkerStopped,
        })
    }
}

/// Job receiver for the background worker.
#[derive(Debug)]
pub struct JobReceiver {
    rx: flume::Receiver<UploadJob>,
}

impl JobReceiver {
    pub fn into_stream(self) -> flume::r#async::RecvStream<'static, UploadJob> {
        self.rx.into_stream()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("upload queue is full - worker may be overloaded")]
    Full,

    #[error("upload worker has been stopped")]
    WorkerStopped,
}

/// Process queued jobs until every sender is dropped. Spawned once at
/// state construction.
pub async fn run_worker(blobs: BlobStore, receiver: JobReceiver) {
    tracing::info!(root = %blobs.root().display(), "starting upload worker");

    let mut jobs = receiver.into_stream();
    while let Some(job) = jobs.next().await {
        let file_name = job.file_name.clone();
        if let Err(e) = execute_job(&blobs, job).await {
            tracing::error!(%file_name, "upload job failed: {}", e);
        }
    }

    tracing::info!("upload queue closed, shutting down worker");
}

/// Persist the payload, then convert it. Conversion is CPU-bound and
/// runs off the async threads.
pub async fn execute_job(blobs: &BlobStore, job: UploadJob) -> Result<(), JobError> {
    let size = job.payload.len();
    let stored = blobs
        .write(&job.file_name, &job.payload)
        .await
        .map_err(JobError::Store)?;
    tracing::debug!(path = %stored.display(), size, "stored original upload");

    let converted = tokio::task::spawn_blocking(move || convert::convert_to_webp(&stored))
        .await
        .map_err(JobError::Canceled)?
        .map_err(JobError::Convert)?;
    tracing::debug!(path = %converted.display(), "wrote converted artifact");

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("unable to persist upload: {0}")]
    Store(std::io::Error),

    #[error("conversion failed: {0}")]
    Convert(convert::ConvertError),

    #[error("conversion task was canceled: {0}")]
    Canceled(tokio::task::JoinError),
}
