use sqlx::Row;

use super::Database;

/// A registered account. `account_hash` is the opaque delivery hash the
/// real service embeds in serving URLs; the emulator only stores it.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account_id: String,
    pub account_hash: String,
}

impl Database {
    /// Insert the account if it is missing. Returns true when a new row
    /// was created.
    pub async fn ensure_account(
        &self,
        account_id: &str,
        account_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO account (account_id, account_hash)
            VALUES (?, ?)
            ON CONFLICT (account_id) DO NOTHING
            "#,
        )
        .bind(account_id)
        .bind(account_hash)
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn account_exists(&self, account_id: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM account WHERE account_id = ?")
            .bind(account_id)
            .fetch_optional(&**self)
            .await?;

        Ok(row.is_some())
    }

    pub async fn get_account(
        &self,
        account_id: &str,
    ) -> Result<Option<AccountRecord>, sqlx::Error> {
        let row = sqlx::query("SELECT account_id, account_hash FROM account WHERE account_id = ?")
            .bind(account_id)
            .fetch_optional(&**self)
            .await?;

        Ok(row.map(|r| AccountRecord {
            account_id: r.get("account_id"),
            account_hash: r.get("account_hash"),
        }))
    }
}
