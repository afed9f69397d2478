#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tarobot::application::events::PrecheckoutPolicy;
use tarobot::domain::card::Card;
use tarobot::domain::ports::{DeliveryChannel, InvoiceParams, PaymentGateway, ReadingOracle};
use tarobot::domain::reading::{ChatId, Position, PositionedCard, ReadingResult, SummarySection};
use tarobot::error::{BotError, Result};
use tarobot::infrastructure::in_memory::InMemoryPendingStore;
use tarobot::interfaces::http::state::AppState;
use tarobot::interfaces::http::router;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Oracle double: counts invocations, records questions, optionally
/// fails.
#[derive(Default)]
pub struct FakeOracle {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub questions: Mutex<Vec<String>>,
}

#[async_trait]
impl ReadingOracle for FakeOracle {
    async fn complete(&self, question: &str, cards: &[Card; 3]) -> Result<ReadingResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.questions.lock().await.push(question.to_string());
        if self.fail {
            return Err(BotError::Oracle("model unavailable".into()));
        }
        let positions = [Position::Past, Position::Present, Position::Future];
        Ok(ReadingResult {
            cards: positions
                .into_iter()
                .zip(cards.iter())
                .map(|(position, card)| PositionedCard {
                    position,
                    name_ru: card.name_ru.clone(),
                    name_en: card.name_en.clone(),
                    image: Some(card.image.clone()),
                })
                .collect(),
            summary: vec![SummarySection::new("Вступление", "Все сложится.")],
        })
    }
}

#[derive(Default)]
pub struct FakeChannel {
    pub sent: Mutex<Vec<(ChatId, String)>>,
}

#[async_trait]
impl DeliveryChannel for FakeChannel {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.sent.lock().await.push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Gateway double: hands out invoice links, records pre-checkout
/// answers and the last invoice parameters.
#[derive(Default)]
pub struct FakeGateway {
    pub invoice_fail: bool,
    pub last_invoice: Mutex<Option<InvoiceParams>>,
    pub answers: Mutex<Vec<(String, bool)>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_invoice_link(&self, params: &InvoiceParams) -> Result<String> {
        if self.invoice_fail {
            return Err(BotError::Provider("createInvoiceLink: gateway down".into()));
        }
        *self.last_invoice.lock().await = Some(params.clone());
        Ok("https://t.me/$invoice".to_string())
    }

    async fn answer_pre_checkout(
        &self,
        query_id: &str,
        ok: bool,
        _error_message: Option<&str>,
    ) -> Result<()> {
        self.answers.lock().await.push((query_id.to_string(), ok));
        Ok(())
    }

    async fn set_webhook(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryPendingStore>,
    pub oracle: Arc<FakeOracle>,
    pub channel: Arc<FakeChannel>,
    pub gateway: Arc<FakeGateway>,
}

pub fn app() -> TestApp {
    app_with(FakeOracle::default(), FakeGateway::default())
}

pub fn app_with(oracle: FakeOracle, gateway: FakeGateway) -> TestApp {
    let store = Arc::new(InMemoryPendingStore::new());
    let oracle = Arc::new(oracle);
    let channel = Arc::new(FakeChannel::default());
    let gateway = Arc::new(gateway);

    let state = AppState::new(
        store.clone(),
        gateway.clone(),
        channel.clone(),
        oracle.clone(),
        PrecheckoutPolicy::default(),
        Some("https://bot.example".to_string()),
    );

    TestApp {
        router: router(state),
        store,
        oracle,
        channel,
        gateway,
    }
}

impl TestApp {
    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }
}

pub fn cards_json() -> Value {
    json!([
        { "name_ru": "Дурак", "name_en": "The Fool", "image": "m00.jpg" },
        { "name_ru": "Маг", "name_en": "The Magician", "image": "m01.jpg" },
        { "name_ru": "Верховная Жрица", "name_en": "The High Priestess", "image": "m02.jpg" },
    ])
}

/// Webhook update carrying a successful payment for `user_id`, with
/// the given invoice payload.
pub fn confirmation_update(user_id: i64, payload: &str, charge_id: &str) -> Value {
    json!({
        "message": {
            "chat": { "id": user_id },
            "from": { "id": user_id },
            "successful_payment": {
                "invoice_payload": payload,
                "currency": "XTR",
                "total_amount": 1,
                "telegram_payment_charge_id": charge_id,
            }
        }
    })
}

pub fn pre_checkout_update(query_id: &str, payload: &str) -> Value {
    json!({
        "pre_checkout_query": { "id": query_id, "invoice_payload": payload }
    })
}
