use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, FromRow, SqlitePool};
use tracing::debug;

use crate::error::StoreError;

/// One entry in a user's chat index: the chat's id, its display label, and
/// when it was first created. A user's index is the set of summaries stored
/// under their user_id, created lazily by the first upsert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub chat_id: String,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatSummary {
    /// Keeps exactly one summary per (user_id, chat_id) up to date with the
    /// latest label. A single conditional upsert: the insert path writes the
    /// supplied created_at, the update path touches only the label, so the
    /// original creation time survives label changes. Two concurrent calls
    /// for the same pair cannot produce duplicate entries.
    pub async fn upsert(
        pool: &SqlitePool,
        user_id: &str,
        chat_id: &str,
        label: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        query(
            r#"
            INSERT INTO user_chats (user_id, chat_id, label, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, chat_id) DO UPDATE SET label = excluded.label
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(label)
        .bind(created_at)
        .execute(pool)
        .await?;

        debug!("Chat summary upserted for user_id={user_id}, chat_id={chat_id}");
        Ok(())
    }

    /// Returns the user's summaries in insertion order, empty if the user has
    /// no index yet.
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Vec<ChatSummary>, StoreError> {
        let summaries = query_as::<_, ChatSummary>(
            r#"
            SELECT chat_id, label, created_at FROM user_chats
            WHERE user_id = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(summaries)
    }
}
