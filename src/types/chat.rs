use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::Message;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListChatsRequest {
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetChatRequest {
    pub user_id: String,
    pub chat_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChatRequest {
    pub user_id: String,
    pub chat_id: String,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessagesRequest {
    pub user_id: String,
    pub chat_id: String,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}
