mod common;

use common::{FakeGateway, FakeOracle, app, app_with};
use serde_json::json;
use tarobot::domain::ports::PendingStore;
use tarobot::domain::token::{CorrelationToken, MAX_PAYLOAD_BYTES};

#[tokio::test]
async fn test_invoice_link_created_with_stars_price() {
    let app = app();

    let (status, body) = app
        .post(
            "/createInvoiceLink",
            json!({
                "userId": 42,
                "message": "Will I pass the exam?",
                "cards": common::cards_json(),
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["invoiceLink"], "https://t.me/$invoice");

    let pending = app.store.get(42).await.unwrap().unwrap();
    assert_eq!(pending.question, "Will I pass the exam?");
    assert_eq!(pending.cards[0].name_en, "The Fool");

    let invoice = app.gateway.last_invoice.lock().await;
    let invoice = invoice.as_ref().unwrap();
    assert_eq!(invoice.currency, "XTR");
    assert_eq!(invoice.amount, 1);
    assert!(invoice.payload.len() <= MAX_PAYLOAD_BYTES);
    let token = CorrelationToken::decode(&invoice.payload).unwrap();
    assert_eq!(token.u, 42);
}

#[tokio::test]
async fn test_missing_fields_are_reported_individually() {
    let app = app();

    let (status, body) = app
        .post(
            "/createInvoiceLink",
            json!({ "message": "q", "cards": common::cards_json() }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "validation error: Missing required field: userId");

    let (status, body) = app
        .post(
            "/createInvoiceLink",
            json!({ "userId": 1, "cards": common::cards_json() }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "validation error: Missing required field: message");

    let (status, body) = app
        .post("/createInvoiceLink", json!({ "userId": 1, "message": "q" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "validation error: Missing required field: cards");
}

#[tokio::test]
async fn test_empty_and_wrong_size_card_lists_are_rejected() {
    let app = app();

    let (status, _) = app
        .post(
            "/createInvoiceLink",
            json!({ "userId": 1, "message": "q", "cards": [] }),
        )
        .await;
    assert_eq!(status, 400);

    let two_cards = json!([
        { "name_ru": "Дурак", "name_en": "The Fool", "image": "m00.jpg" },
        { "name_ru": "Маг", "name_en": "The Magician", "image": "m01.jpg" },
    ]);
    let (status, body) = app
        .post(
            "/createInvoiceLink",
            json!({ "userId": 1, "message": "q", "cards": two_cards }),
        )
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("exactly 3 cards"));

    // Nothing half-written.
    assert!(app.store.get(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_question_is_rejected() {
    let app = app();

    let (status, _) = app
        .post(
            "/createInvoiceLink",
            json!({ "userId": 1, "message": "  ", "cards": common::cards_json() }),
        )
        .await;
    assert_eq!(status, 400);
    assert!(app.store.get(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_provider_failure_returns_bad_gateway_and_rolls_back() {
    let app = app_with(
        FakeOracle::default(),
        FakeGateway {
            invoice_fail: true,
            ..Default::default()
        },
    );

    let (status, body) = app
        .post(
            "/createInvoiceLink",
            json!({ "userId": 9, "message": "q", "cards": common::cards_json() }),
        )
        .await;
    assert_eq!(status, 502);
    assert!(body["error"].as_str().unwrap().contains("gateway down"));

    // The unpayable entry must not shadow the user's next attempt.
    assert!(app.store.get(9).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reissuing_overwrites_previous_request() {
    let app = app();

    for question in ["First question", "Second question"] {
        let (status, _) = app
            .post(
                "/createInvoiceLink",
                json!({ "userId": 5, "message": question, "cards": common::cards_json() }),
            )
            .await;
        assert_eq!(status, 200);
    }

    let pending = app.store.get(5).await.unwrap().unwrap();
    assert_eq!(pending.question, "Second question");
}
