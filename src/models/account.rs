use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, FromRow, SqlitePool};
use tracing::debug;

use crate::error::StoreError;

/// A user account. `password` holds only the bcrypt hash; the HTTP layer
/// strips it before anything leaves the process.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub user_id: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Inserts a new account. Both user_id and email are unique; a duplicate
    /// of either is rejected as a conflict and the second account is never
    /// created.
    pub async fn create(pool: &SqlitePool, account: &Account) -> Result<Account, StoreError> {
        query(
            r#"
            INSERT INTO accounts (user_id, email, password, first_name, last_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.user_id)
        .bind(&account.email)
        .bind(&account.password)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.created_at)
        .execute(pool)
        .await?;

        debug!("Account created for user_id={}", account.user_id);
        Ok(account.clone())
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = query_as::<_, Account>("SELECT * FROM accounts WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(account)
    }

    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = query_as::<_, Account>("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(account)
    }
}
