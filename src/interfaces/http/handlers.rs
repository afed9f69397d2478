use super::error::ApiError;
use super::state::AppState;
use super::wire::{
    InvoiceLinkRequest, InvoiceLinkResponse, StatusRequest, StatusResponse, Update,
};
use crate::domain::reading::UserId;
use crate::error::BotError;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::Html;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info};

const WELCOME_TEXT: &str = "🔮 *Привет! Я помогу тебе с раскладом Таро!*\n\n\
    ✨ Я создам персональный прогноз на любой твой вопрос.\n\n\
    📝 *Как это работает:*\n\
    1. Открой приложение Taro AI\n\
    2. Задай свой вопрос\n\
    3. Выбери 3 карты\n\
    4. Получи подробное толкование от AI\n\n\
    📱 Выбери в левом нижнем углу *«Открыть Taro AI»*";

/// Inbound Telegram webhook. The provider treats any non-2xx as "not
/// yet handled" and redelivers, so once an update has been processed
/// this handler answers 200 even when processing failed internally;
/// failures are logged, never propagated to the provider.
pub async fn webhook(State(state): State<Arc<AppState>>, Json(update): Json<Update>) -> Json<Value> {
    if let Some(event) = update.payment_event() {
        if let Err(e) = state.events.handle(event).await {
            error!(error = %e, "payment event processing failed");
        }
        return Json(json!({ "ok": true }));
    }

    if let Some(message) = &update.message
        && let Some(text) = &message.text
    {
        let lowered = text.to_lowercase();
        if lowered == "/start" || lowered.starts_with("/start ") {
            if let Err(e) = state.channel.send_message(message.chat.id, WELCOME_TEXT).await {
                error!(chat_id = message.chat.id, error = %e, "welcome message not delivered");
            }
        } else {
            debug!(chat_id = message.chat.id, "ignoring non-command text message");
        }
    }

    Json(json!({ "ok": true }))
}

/// Mini-app entry point: validates the request, draws nothing (the
/// app sends the chosen cards), and returns a payable invoice link.
pub async fn create_invoice_link(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InvoiceLinkRequest>,
) -> Result<Json<InvoiceLinkResponse>, ApiError> {
    let user_id = request
        .user_id
        .ok_or_else(|| BotError::Validation("Missing required field: userId".into()))?;
    let question = request
        .message
        .ok_or_else(|| BotError::Validation("Missing required field: message".into()))?;
    let cards = request
        .cards
        .ok_or_else(|| BotError::Validation("Missing required field: cards".into()))?;
    if cards.is_empty() {
        return Err(BotError::Validation("Field cards must contain at least 1 card".into()).into());
    }

    info!(user_id, "invoice link requested");
    // A user's private chat id equals their user id; that is where
    // the fulfillment lands unless the payment message says otherwise.
    let invoice_link = state.issuer.issue(user_id, user_id, &question, cards).await?;
    Ok(Json(InvoiceLinkResponse { invoice_link }))
}

pub async fn reading_status_get(
    State(state): State<Arc<AppState>>,
    Query(request): Query<StatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    reading_status(state, request.user_id).await
}

pub async fn reading_status_post(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    reading_status(state, request.user_id).await
}

/// Alternate fulfillment trigger polled by the mini-app after payment.
/// Shares the exactly-once semantics of the webhook path: the entry is
/// `take`n before the oracle runs, so a second poll finds nothing.
async fn reading_status(
    state: Arc<AppState>,
    user_id: Option<UserId>,
) -> Result<Json<StatusResponse>, ApiError> {
    let user_id =
        user_id.ok_or_else(|| BotError::Validation("Missing required field: userId".into()))?;

    let Some(pending) = state.store.take(user_id).await? else {
        return Err(BotError::NotFound("Reading not found or already processed".into()).into());
    };

    info!(user_id, "fulfilling reading via status endpoint");
    let result = state.dispatcher.read(&pending).await?;

    Ok(Json(StatusResponse {
        success: true,
        user_id,
        question: pending.question,
        cards: result.cards,
        summary: result.summary,
    }))
}

/// Registers the webhook URL with the provider.
pub async fn set_webhook(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    let public_url = state
        .public_url
        .as_deref()
        .ok_or_else(|| BotError::Validation("public URL is not configured".into()))?;
    state
        .gateway
        .set_webhook(&format!("{public_url}/webhook"))
        .await?;
    Ok("Webhook successfully set".to_string())
}

pub async fn index() -> Html<&'static str> {
    Html("<h1>Telegram Bot Webhook is Running</h1>")
}
