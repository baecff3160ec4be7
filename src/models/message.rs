use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry of a chat transcript, exactly as the client submits it. The
/// server never reorders, merges, or deduplicates messages; the array is
/// stored and returned wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    /// Caller-assigned epoch timestamp, not server-generated.
    pub created_at: i64,
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub first_name: String,
    pub role: String,
}
