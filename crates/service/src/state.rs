use url::Url;

use crate::blobs::BlobStore;
use crate::config::{Config, DEFAULT_ACCOUNT_HASH, DEFAULT_ACCOUNT_ID};
use crate::database::{Database, DatabaseSetupError};
use crate::worker::{run_worker, UploadQueue};

/// Main service state - owns the metadata store, the blob store, and the
/// sending half of the upload queue.
#[derive(Clone)]
pub struct State {
    database: Database,
    blobs: BlobStore,
    jobs: UploadQueue,
    public_url: Url,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. metadata store
        let database = Database::connect(config.sqlite_path.as_deref()).await?;

        if config.seed_default_account {
            let created = database
                .ensure_account(DEFAULT_ACCOUNT_ID, DEFAULT_ACCOUNT_HASH)
                .await
                .map_err(StateSetupError::Seed)?;
            if created {
                tracing::info!(
                    account_id = DEFAULT_ACCOUNT_ID,
                    account_hash = DEFAULT_ACCOUNT_HASH,
                    "created the default account"
                );
            }
        }

        // 2. blob store
        let storage_path = config.storage_path.clone().unwrap_or_else(|| {
            let temp_dir = tempfile::tempdir().expect("failed to create temporary directory");
            temp_dir.keep()
        });
        tracing::info!(path = %storage_path.display(), "using image storage root");
        let blobs = BlobStore::open(&storage_path)
            .await
            .map_err(StateSetupError::Storage)?;

        // 3. upload worker
        let (jobs, receiver) = UploadQueue::new();
        let worker_blobs = blobs.clone();
        tokio::spawn(async move {
            run_worker(worker_blobs, receiver).await;
        });

        Ok(Self {
            database,
            blobs,
            jobs,
            public_url: config.public_url.clone(),
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn jobs(&self) -> &UploadQueue {
        &self.jobs
    }

    pub fn public_url(&self) -> &Url {
        &self.public_url
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("database setup error: {0}")]
    Database(#[from] DatabaseSetupError),

    #[error("unable to seed the default account: {0}")]
    Seed(sqlx::Error),

    #[error("unable to open the image storage root: {0}")]
    Storage(std::io::Error),
}
