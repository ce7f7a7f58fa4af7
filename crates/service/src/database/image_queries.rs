use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Database;

/// A single image row. `name` stays NULL and `draft` stays set from
/// creation until the binary payload is accepted.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub image_id: Uuid,
    pub name: Option<String>,
    pub uploaded_at: i64,
    pub require_signed_urls: bool,
    pub draft: bool,
    pub account_id: String,
}

fn record_from_row(row: &SqliteRow) -> ImageRecord {
    ImageRecord {
        image_id: Uuid::parse_str(&row.get::<String, _>("image_id"))
            .expect("invalid image_id UUID in database"),
        name: row.get("name"),
        uploaded_at: row.get("uploaded_at"),
        require_signed_urls: row.get::<i64, _>("require_signed_urls") != 0,
        draft: row.get::<i64, _>("draft") != 0,
        account_id: row.get("account_id"),
    }
}

const IMAGE_COLUMNS: &str =
    "image_id, name, uploaded_at, require_signed_urls, draft, account_id";

impl Database {
    /// Create a draft image row for the account and return its id.
    pub async fn insert_draft_image(&self, account_id: &str) -> Result<Uuid, sqlx::Error> {
        let image_id = Uuid::new_v4();
        let uploaded_at = OffsetDateTime::now_utc().unix_timestamp();

        sqlx::query(
            r#"
            INSERT INTO image (image_id, name, uploaded_at, require_signed_urls, draft, account_id)
            VALUES (?, NULL, ?, 0, 1, ?)
            "#,
        )
        .bind(image_id.to_string())
        .bind(uploaded_at)
        .bind(account_id)
        .execute(&**self)
        .await?;

        Ok(image_id)
    }

    /// Publish a draft in one conditional update: the name is written and
    /// the draft flag cleared only while the row is still a draft.
    /// Returns false when no draft row matched (unknown id, or already
    /// published).
    pub async fn publish_image(&self, image_id: &Uuid, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE image SET draft = 0, name = ? WHERE image_id = ? AND draft = 1")
            .bind(name)
            .bind(image_id.to_string())
            .execute(&**self)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Point lookup for the serving path. All three predicates must
    /// match; a draft or foreign image is indistinguishable from an
    /// absent one.
    pub async fn find_published_image(
        &self,
        account_id: &str,
        image_id: &Uuid,
    ) -> Result<Option<ImageRecord>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {IMAGE_COLUMNS} FROM image WHERE image_id = ? AND account_id = ? AND draft = 0"
        ))
        .bind(image_id.to_string())
        .bind(account_id)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| record_from_row(&r)))
    }

    /// Unscoped point lookup.
    pub async fn find_image(&self, image_id: &Uuid) -> Result<Option<ImageRecord>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {IMAGE_COLUMNS} FROM image WHERE image_id = ?"
        ))
        .bind(image_id.to_string())
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| record_from_row(&r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect(None).await.unwrap();
        db.ensure_account("acct1", "hash1").await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_draft_shape() {
        let db = test_db().await;

        let image_id = db.insert_draft_image("acct1").await.unwrap();
        let record = db.find_image(&image_id).await.unwrap().unwrap();

        assert_eq!(record.image_id, image_id);
        assert_eq!(record.name, None);
        assert!(record.draft);
        assert!(!record.require_signed_urls);
        assert_eq!(record.account_id, "acct1");
        assert!(record.uploaded_at > 0);
    }

    #[tokio::test]
    async fn test_publish_transitions_exactly_once() {
        let db = test_db().await;
        let image_id = db.insert_draft_image("acct1").await.unwrap();

        assert!(db.publish_image(&image_id, "cat").await.unwrap());
        let record = db.find_image(&image_id).await.unwrap().unwrap();
        assert!(!record.draft);
        assert_eq!(record.name.as_deref(), Some("cat"));

        // a second publish finds no draft row and changes nothing
        assert!(!db.publish_image(&image_id, "dog").await.unwrap());
        let record = db.find_image(&image_id).await.unwrap().unwrap();
        assert_eq!(record.name.as_deref(), Some("cat"));
    }

    #[tokio::test]
    async fn test_publish_unknown_image() {
        let db = test_db().await;
        assert!(!db.publish_image(&Uuid::new_v4(), "cat").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_published_requires_all_predicates() {
        let db = test_db().await;
        db.ensure_account("acct2", "hash2").await.unwrap();
        let image_id = db.insert_draft_image("acct1").await.unwrap();

        // draft rows are invisible even to the owning account
        assert!(db
            .find_published_image("acct1", &image_id)
            .await
            .unwrap()
            .is_none());

        db.publish_image(&image_id, "cat").await.unwrap();

        assert!(db
            .find_published_image("acct1", &image_id)
            .await
            .unwrap()
            .is_some());
        assert!(db
            .find_published_image("acct2", &image_id)
            .await
            .unwrap()
            .is_none());
        assert!(db
            .find_published_image("acct1", &Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_foreign_key_rejects_unknown_account() {
        let db = test_db().await;
        assert!(db.insert_draft_image("ghost").await.is_err());
    }
}
