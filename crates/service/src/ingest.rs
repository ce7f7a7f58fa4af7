//! The ingestion core: upload-slot issuance, upload completion, the
//! single-step upload, and published-image retrieval.
//!
//! Both upload flows converge on the same conditional draft→published
//! transition, so the name is written exactly once and a crash mid-flow
//! can only leave an anonymous draft behind.

use std::path::Path;

use url::Url;
use uuid::Uuid;

use crate::blobs;
use crate::state::State;
use crate::worker::{QueueError, UploadJob};

/// Media type every published image is served with. The emulator never
/// negotiates formats.
pub const SERVED_CONTENT_TYPE: &str = "image/webp";

/// Issued by the token flow: where the client should POST its payload.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    pub image_id: Uuid,
    pub upload_url: Url,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("account does not exist")]
    UnknownAccount,

    #[error("no matching image")]
    NotFound,

    #[error("invalid upload file name")]
    InvalidFileName,

    #[error("upload queue refused the job: {0}")]
    Queue(#[from] QueueError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("blob store error: {0}")]
    Storage(#[from] std::io::Error),
}

impl State {
    /// Issue an upload slot: a fresh draft image row plus the URL the
    /// payload should later be POSTed to. Touches only the metadata
    /// store.
    pub async fn request_upload_slot(&self, account_id: &str) -> Result<UploadSlot, IngestError> {
        if !self.database().account_exists(account_id).await? {
            return Err(IngestError::UnknownAccount);
        }

        let image_id = self.database().insert_draft_image(account_id).await?;
        let upload_url = self
            .public_url()
            .join(&format!("/upload/{}", image_id))
            .expect("upload path is always joinable");

        tracing::info!(%image_id, account_id, "issued upload slot");
        Ok(UploadSlot {
            image_id,
            upload_url,
        })
    }

    /// Accept the payload for a previously issued slot. The metadata
    /// transition commits before the deferred store/convert work runs,
    /// so the caller sees success while the artifact may still be in
    /// flight.
    pub async fn complete_upload(
        &self,
        image_id: &Uuid,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<(), IngestError> {
        let file_name = blobs::clean_file_name(file_name).ok_or(IngestError::InvalidFileName)?;
        let name = display_name(&file_name);

        if !self.database().publish_image(image_id, &name).await? {
            return Err(IngestError::NotFound);
        }

        self.jobs().enqueue(UploadJob { file_name, payload })?;

        tracing::info!(%image_id, %name, "published image");
        Ok(())
    }

    /// Single-step upload: create the draft and immediately publish it
    /// through the same conditional update the token flow uses.
    pub async fn direct_upload(
        &self,
        account_id: &str,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<Uuid, IngestError> {
        if !self.database().account_exists(account_id).await? {
            return Err(IngestError::UnknownAccount);
        }
        let file_name = blobs::clean_file_name(file_name).ok_or(IngestError::InvalidFileName)?;
        let name = display_name(&file_name);

        let image_id = self.database().insert_draft_image(account_id).await?;
        if !self.database().publish_image(&image_id, &name).await? {
            return Err(IngestError::NotFound);
        }

        self.jobs().enqueue(UploadJob { file_name, payload })?;

        tracing::info!(%image_id, account_id, %name, "accepted direct upload");
        Ok(image_id)
    }

    /// Resolve a published image to its converted artifact. Draft, wrong
    /// account, unknown id, and a conversion that never landed all look
    /// the same to the caller.
    pub async fn fetch_published(
        &self,
        account_id: &str,
        image_id: &Uuid,
    ) -> Result<Vec<u8>, IngestError> {
        let record = self
            .database()
            .find_published_image(account_id, image_id)
            .await?
            .ok_or(IngestError::NotFound)?;

        // name is non-null for published rows; treat a violation as absent
        let name = record.name.ok_or(IngestError::NotFound)?;
        let artifact = format!("{}.webp", name);

        self.blobs()
            .read(&artifact)
            .await?
            .ok_or(IngestError::NotFound)
    }
}

/// Display name of an upload: the file name with its extension stripped.
fn display_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("cat.png"), "cat");
        assert_eq!(display_name("archive.tar.gz"), "archive.tar");
        assert_eq!(display_name("noext"), "noext");
    }
}
