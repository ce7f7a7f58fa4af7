mod account_queries;
mod image_queries;

pub use account_queries::AccountRecord;
pub use image_queries::ImageRecord;

use std::ops::Deref;
use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// SQLite-backed metadata store for accounts and images.
#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    /// Connect to a file-backed database, or an in-memory one when no
    /// path is given, and bring the schema up to date. Migrations are
    /// idempotent and never touch existing rows.
    pub async fn connect(path: Option<&Path>) -> Result<Self, DatabaseSetupError> {
        let pool = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(DatabaseSetupError::Io)?;
                }

                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .foreign_keys(true);

                SqlitePoolOptions::new()
                    .max_connections(5)
                    .connect_with(options)
                    .await
                    .map_err(DatabaseSetupError::Unavailable)?
            }
            None => {
                // a single connection keeps every handle on the same
                // in-memory database
                let options = SqliteConnectOptions::new()
                    .filename(":memory:")
                    .foreign_keys(true);

                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options)
                    .await
                    .map_err(DatabaseSetupError::Unavailable)?
            }
        };

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DatabaseSetupError::MigrationFailed)?;

        Ok(Database(pool))
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(sqlx::Error),

    #[error("unable to create the database directory: {0}")]
    Io(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_rerun_without_data_loss() {
        let temp = tempfile::TempDir::new().unwrap();
        let db_path = temp.path().join("picdock.db");

        let db = Database::connect(Some(&db_path)).await.unwrap();
        db.ensure_account("acct", "hash").await.unwrap();
        drop(db);

        let db = Database::connect(Some(&db_path)).await.unwrap();
        assert!(db.account_exists("acct").await.unwrap());
    }
}
