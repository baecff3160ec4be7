use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{query, Row, SqlitePool};
use tracing::debug;

use crate::error::StoreError;
use crate::models::message::Message;

/// The authoritative message history and metadata for one (user_id, chat_id)
/// pair. The pair is unique store-wide; at most one document exists per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub user_id: String,
    pub chat_id: String,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Chat {
    fn from_row(row: &SqliteRow) -> Result<Self, StoreError> {
        let raw_messages: String = row.try_get("messages")?;
        Ok(Chat {
            user_id: row.try_get("user_id")?,
            chat_id: row.try_get("chat_id")?,
            model: row.try_get("model")?,
            created_at: row.try_get("created_at")?,
            messages: serde_json::from_str(&raw_messages)?,
        })
    }

    /// Stores the latest transcript snapshot for the pair: model, created_at
    /// and the whole message array are replaced with the supplied values, no
    /// merge with whatever was stored before. Creates the document if the
    /// pair is new. Returns the post-update state.
    pub async fn upsert_messages(
        pool: &SqlitePool,
        user_id: &str,
        chat_id: &str,
        model: Option<&str>,
        created_at: DateTime<Utc>,
        messages: &[Message],
    ) -> Result<Chat, StoreError> {
        let payload = serde_json::to_string(messages)?;

        let row = query(
            r#"
            INSERT INTO chats (user_id, chat_id, model, created_at, messages)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id, chat_id) DO UPDATE
            SET model = excluded.model,
                created_at = excluded.created_at,
                messages = excluded.messages
            RETURNING user_id, chat_id, model, created_at, messages
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(model)
        .bind(created_at)
        .bind(payload)
        .fetch_one(pool)
        .await?;

        let chat = Chat::from_row(&row)?;
        debug!(
            "Chat upserted for user_id={user_id}, chat_id={chat_id} with {} messages",
            chat.messages.len()
        );
        Ok(chat)
    }

    pub async fn find(
        pool: &SqlitePool,
        user_id: &str,
        chat_id: &str,
    ) -> Result<Option<Chat>, StoreError> {
        let row = query(
            r#"
            SELECT user_id, chat_id, model, created_at, messages FROM chats
            WHERE user_id = ? AND chat_id = ?
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Chat::from_row(&row)?)),
            None => Ok(None),
        }
    }
}
