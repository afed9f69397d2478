use crate::domain::ports::{DeliveryChannel, InvoiceParams, PaymentGateway};
use crate::domain::reading::ChatId;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
/// Bound on every Bot API call; a hung provider call must become a
/// provider error, not a hang.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin Telegram Bot API client backing both the payment gateway and
/// the delivery channel.
#[derive(Clone)]
pub struct TelegramApi {
    client: Client,
    base_url: String,
    token: String,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl TelegramApi {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(token: String, base_url: String) -> Result<Self> {
        if token.is_empty() {
            return Err(BotError::Configuration("bot token is not set".into()));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    async fn call<T, B>(&self, method: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BotError::Provider(format!("{method}: provider did not respond in time"))
                } else {
                    BotError::Provider(format!("{method}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BotError::Provider(format!("{method}: HTTP {status}: {text}")));
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Provider(format!("{method}: invalid response: {e}")))?;

        if !envelope.ok {
            return Err(BotError::Provider(format!(
                "{method}: {}",
                envelope.description.unwrap_or_else(|| "unknown error".into())
            )));
        }
        envelope
            .result
            .ok_or_else(|| BotError::Provider(format!("{method}: missing result")))
    }
}

#[async_trait]
impl PaymentGateway for TelegramApi {
    async fn create_invoice_link(&self, params: &InvoiceParams) -> Result<String> {
        self.call(
            "createInvoiceLink",
            &json!({
                "title": params.title,
                "description": params.description,
                "payload": params.payload,
                // Empty provider token selects Telegram Stars.
                "provider_token": "",
                "currency": params.currency,
                "prices": [{ "label": params.price_label, "amount": params.amount }],
            }),
        )
        .await
    }

    async fn answer_pre_checkout(
        &self,
        query_id: &str,
        ok: bool,
        error_message: Option<&str>,
    ) -> Result<()> {
        let _: bool = self
            .call(
                "answerPreCheckoutQuery",
                &json!({
                    "pre_checkout_query_id": query_id,
                    "ok": ok,
                    "error_message": error_message.unwrap_or(""),
                }),
            )
            .await?;
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<()> {
        let _: bool = self
            .call(
                "setWebhook",
                &json!({
                    "url": url,
                    "allowed_updates": ["message", "callback_query", "pre_checkout_query"],
                }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DeliveryChannel for TelegramApi {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &json!({
                    "chat_id": chat_id,
                    "text": text,
                    "parse_mode": "Markdown",
                }),
            )
            .await?;
        Ok(())
    }
}
