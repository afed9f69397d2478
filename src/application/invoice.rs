use crate::domain::card::Card;
use crate::domain::ports::{InvoiceParams, PaymentGatewayRef, PendingStoreRef};
use crate::domain::reading::{ChatId, PendingReading, UserId, spread_of};
use crate::domain::token::{CorrelationToken, now_ms};
use crate::error::{BotError, Result};
use tracing::{info, warn};

const INVOICE_TITLE: &str = "Расклад Таро";
const INVOICE_DESCRIPTION: &str =
    "Персональный расклад из 3 карт Таро с подробным толкованием от AI";
/// Telegram Stars.
const INVOICE_CURRENCY: &str = "XTR";
const STARS_PRICE: i64 = 1;

/// Builds payable invoices and registers the pending entry they pay
/// for.
pub struct InvoiceIssuer {
    store: PendingStoreRef,
    gateway: PaymentGatewayRef,
}

impl InvoiceIssuer {
    pub fn new(store: PendingStoreRef, gateway: PaymentGatewayRef) -> Self {
        Self { store, gateway }
    }

    /// Issues an invoice for one reading.
    ///
    /// Writes the pending entry first (overwriting any prior entry for
    /// the user), then asks the provider for an invoice link. If the
    /// provider call fails, the just-written entry is rolled back —
    /// otherwise a stale unpayable entry would shadow the user's next
    /// attempt until overwritten.
    pub async fn issue(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        question: &str,
        cards: Vec<Card>,
    ) -> Result<String> {
        if question.trim().is_empty() {
            return Err(BotError::Validation("question must not be empty".into()));
        }
        let cards = spread_of(cards)?;

        let issued_at = now_ms();
        let payload = CorrelationToken::new(user_id, issued_at).encode()?;

        self.store
            .put(PendingReading {
                user_id,
                chat_id,
                question: question.to_string(),
                cards,
                created_at: issued_at,
            })
            .await?;

        let params = InvoiceParams {
            title: INVOICE_TITLE.to_string(),
            description: INVOICE_DESCRIPTION.to_string(),
            payload,
            currency: INVOICE_CURRENCY.to_string(),
            price_label: INVOICE_TITLE.to_string(),
            amount: STARS_PRICE,
        };

        match self.gateway.create_invoice_link(&params).await {
            Ok(link) => {
                info!(user_id, "invoice link created");
                Ok(link)
            }
            Err(e) => {
                warn!(user_id, error = %e, "invoice creation failed, rolling back pending entry");
                // No invoice reached the user, so nothing can pay for
                // this entry.
                self.store.delete(user_id).await?;
                Err(e)
            }
        }
    }
}
