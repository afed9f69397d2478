use super::card::Card;
use super::reading::{ChatId, PendingReading, ReadingResult, UserId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The single shared mutable resource of the system: one in-flight
/// reading per user, keyed by user id.
///
/// All cross-task correctness hinges on `take` being atomic — of two
/// concurrent callers racing for the same user, at most one may
/// observe a present value. The other sees `None` and must treat that
/// as "already handled", not as an error.
#[async_trait]
pub trait PendingStore: Send + Sync {
    /// Inserts the entry, overwriting any prior one for the same user.
    async fn put(&self, reading: PendingReading) -> Result<()>;
    /// Non-destructive peek.
    async fn get(&self, user_id: UserId) -> Result<Option<PendingReading>>;
    /// Atomic read-and-delete.
    async fn take(&self, user_id: UserId) -> Result<Option<PendingReading>>;
    async fn delete(&self, user_id: UserId) -> Result<()>;
}

/// External text-generation service producing the interpretation.
#[async_trait]
pub trait ReadingOracle: Send + Sync {
    async fn complete(&self, question: &str, cards: &[Card; 3]) -> Result<ReadingResult>;
}

/// Provider-facing invoice descriptor built by the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceParams {
    pub title: String,
    pub description: String,
    /// Encoded correlation token, already checked against the size
    /// ceiling.
    pub payload: String,
    pub currency: String,
    pub price_label: String,
    pub amount: i64,
}

/// Payment platform operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a payable invoice link carrying the correlation token.
    async fn create_invoice_link(&self, params: &InvoiceParams) -> Result<String>;
    /// Answers a pre-checkout query. Must be called promptly; the
    /// provider auto-cancels unanswered charges.
    async fn answer_pre_checkout(
        &self,
        query_id: &str,
        ok: bool,
        error_message: Option<&str>,
    ) -> Result<()>;
    /// Registers the inbound webhook URL with the provider.
    async fn set_webhook(&self, url: &str) -> Result<()>;
}

/// Outbound message channel back to the user.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<()>;
}

pub type PendingStoreRef = Arc<dyn PendingStore>;
pub type ReadingOracleRef = Arc<dyn ReadingOracle>;
pub type PaymentGatewayRef = Arc<dyn PaymentGateway>;
pub type DeliveryChannelRef = Arc<dyn DeliveryChannel>;
