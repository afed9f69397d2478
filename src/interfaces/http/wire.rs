//! Wire shapes for the inbound webhook and the mini-app endpoints.

use crate::domain::card::Card;
use crate::domain::event::PaymentEvent;
use crate::domain::reading::{PositionedCard, SummarySection, UserId};
use serde::{Deserialize, Serialize};

/// Telegram update envelope, reduced to the three event shapes this
/// service consumes.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub message: Option<IncomingMessage>,
    pub pre_checkout_query: Option<PreCheckoutQuery>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub from: Option<Sender>,
    pub text: Option<String>,
    pub successful_payment: Option<SuccessfulPayment>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PreCheckoutQuery {
    pub id: String,
    pub invoice_payload: String,
}

#[derive(Debug, Deserialize)]
pub struct SuccessfulPayment {
    pub invoice_payload: String,
    pub currency: String,
    pub total_amount: i64,
    pub telegram_payment_charge_id: String,
}

impl Update {
    /// Extracts the payment event, if this update carries one.
    pub fn payment_event(&self) -> Option<PaymentEvent> {
        if let Some(query) = &self.pre_checkout_query {
            return Some(PaymentEvent::PreCheckout {
                query_id: query.id.clone(),
                payload: query.invoice_payload.clone(),
            });
        }
        if let Some(message) = &self.message
            && let Some(payment) = &message.successful_payment
        {
            let user_id = message.from.as_ref().map_or(message.chat.id, |s| s.id);
            return Some(PaymentEvent::Confirmed {
                payload: payment.invoice_payload.clone(),
                currency: payment.currency.clone(),
                amount: payment.total_amount,
                charge_id: payment.telegram_payment_charge_id.clone(),
                chat_id: message.chat.id,
                user_id,
            });
        }
        None
    }
}

/// `POST /createInvoiceLink` request body. Fields are optional so
/// missing ones can be reported individually instead of as a generic
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct InvoiceLinkRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<UserId>,
    pub message: Option<String>,
    pub cards: Option<Vec<Card>>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceLinkResponse {
    #[serde(rename = "invoiceLink")]
    pub invoice_link: String,
}

/// `userId` carrier for `/reading-paid`, via query string or body.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub question: String,
    pub cards: Vec<PositionedCard>,
    pub summary: Vec<SummarySection>,
}
