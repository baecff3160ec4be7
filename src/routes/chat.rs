use std::sync::Arc;

use actix_web::{post, web, Error, HttpResponse, Scope};
use tracing::{error, info};

use crate::models::{Chat, ChatSummary};
use crate::types::{GetChatRequest, ListChatsRequest, SaveMessagesRequest, UpdateChatRequest};
use crate::AppState;

pub fn routes() -> Scope {
    web::scope("/chat")
        .service(list_chats)
        .service(get_chat)
        .service(update_chat)
        .service(save_messages)
}

/// Returns the caller's chat index. Lookup failures degrade to an empty list,
/// indistinguishable from a user with no chats.
#[post("/list")]
async fn list_chats(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<ListChatsRequest>,
) -> web::Json<Vec<ChatSummary>> {
    info!("/chat/list userId={}", request.user_id);
    match ChatSummary::list_for_user(&app_state.pool, &request.user_id).await {
        Ok(chats) => web::Json(chats),
        Err(e) => {
            error!("Failed to list chats for userId={}: {e}", request.user_id);
            web::Json(Vec::new())
        }
    }
}

#[post("/get")]
async fn get_chat(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<GetChatRequest>,
) -> Result<web::Json<Chat>, Error> {
    info!(
        "/chat/get userId={}, chatId={}",
        request.user_id, request.chat_id
    );
    match Chat::find(&app_state.pool, &request.user_id, &request.chat_id).await {
        Ok(Some(chat)) => Ok(web::Json(chat)),
        Ok(None) => Err(actix_web::error::ErrorNotFound("chat not found")),
        Err(e) => {
            error!("Failed to fetch chat chatId={}: {e}", request.chat_id);
            Err(actix_web::error::ErrorNotFound("chat not found"))
        }
    }
}

/// Best-effort label upsert: the client is acknowledged whether or not the
/// write stuck; failures are visible only in the server log.
#[post("/update")]
async fn update_chat(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<UpdateChatRequest>,
) -> HttpResponse {
    info!(
        "/chat/update userId={}, chatId={}",
        request.user_id, request.chat_id
    );
    if let Err(e) = ChatSummary::upsert(
        &app_state.pool,
        &request.user_id,
        &request.chat_id,
        request.label.as_deref(),
        request.created_at,
    )
    .await
    {
        error!(
            "Failed to upsert chat summary chatId={}: {e}",
            request.chat_id
        );
    }
    HttpResponse::Ok().finish()
}

/// Best-effort transcript save, same acknowledgement policy as /update.
#[post("/save-messages")]
async fn save_messages(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<SaveMessagesRequest>,
) -> HttpResponse {
    info!(
        "/chat/save-messages userId={}, chatId={}, {} messages",
        request.user_id,
        request.chat_id,
        request.messages.len()
    );
    if let Err(e) = Chat::upsert_messages(
        &app_state.pool,
        &request.user_id,
        &request.chat_id,
        request.model.as_deref(),
        request.created_at,
        &request.messages,
    )
    .await
    {
        error!(
            "Failed to save messages for chatId={}: {e}",
            request.chat_id
        );
    }
    HttpResponse::Ok().finish()
}
