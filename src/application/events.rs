use super::fulfillment::FulfillmentDispatcher;
use crate::domain::event::PaymentEvent;
use crate::domain::ports::{DeliveryChannelRef, PaymentGatewayRef, PendingStoreRef};
use crate::domain::reading::{ChatId, UserId};
use crate::domain::token::CorrelationToken;
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

const PAYMENT_RECEIVED_TEXT: &str = "✅ Оплата прошла успешно! Начинаю гадание...";

/// Decides whether a pre-checkout query is approved. The answer must
/// go out within the provider's short deadline, so a policy may not
/// perform blocking I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecheckoutPolicy {
    /// Approve only if the correlation token decodes. An undecodable
    /// token cannot be correlated later, so honoring the charge would
    /// take money for a reading that can never be delivered.
    #[default]
    RequireDecodableToken,
    /// Approve unconditionally, including undecodable tokens.
    AlwaysApprove,
}

impl PrecheckoutPolicy {
    fn should_approve(self, token: &Result<CorrelationToken>) -> bool {
        match self {
            PrecheckoutPolicy::RequireDecodableToken => token.is_ok(),
            PrecheckoutPolicy::AlwaysApprove => true,
        }
    }
}

/// Consumes provider payment events and drives the per-token state
/// machine: issued entries become fulfilled exactly once, duplicates
/// become no-ops.
pub struct PaymentEventHandler {
    store: PendingStoreRef,
    gateway: PaymentGatewayRef,
    channel: DeliveryChannelRef,
    dispatcher: Arc<FulfillmentDispatcher>,
    policy: PrecheckoutPolicy,
}

impl PaymentEventHandler {
    pub fn new(
        store: PendingStoreRef,
        gateway: PaymentGatewayRef,
        channel: DeliveryChannelRef,
        dispatcher: Arc<FulfillmentDispatcher>,
        policy: PrecheckoutPolicy,
    ) -> Self {
        Self {
            store,
            gateway,
            channel,
            dispatcher,
            policy,
        }
    }

    pub async fn handle(&self, event: PaymentEvent) -> Result<()> {
        match event {
            PaymentEvent::PreCheckout { query_id, payload } => {
                self.handle_pre_checkout(&query_id, &payload).await
            }
            PaymentEvent::Confirmed {
                payload,
                currency,
                amount,
                charge_id,
                chat_id,
                user_id,
            } => {
                self.handle_confirmed(&payload, &currency, amount, &charge_id, chat_id, user_id)
                    .await
            }
        }
    }

    /// Answers the provider's "may I charge this" query. Nothing here
    /// may block beyond the acknowledgment call itself.
    async fn handle_pre_checkout(&self, query_id: &str, payload: &str) -> Result<()> {
        let token = CorrelationToken::decode(payload);
        let ok = self.policy.should_approve(&token);
        if !ok {
            warn!(query_id, "rejecting pre-checkout with undecodable token");
        }
        let error_message = (!ok).then_some("Платеж не может быть обработан");
        self.gateway
            .answer_pre_checkout(query_id, ok, error_message)
            .await
    }

    /// Correlates a confirmed payment back to its pending entry and
    /// fulfills it.
    ///
    /// `take` is atomic and destructive, so a duplicated confirmation
    /// finds nothing on its second delivery and drops out without a
    /// second oracle call. There is no charge-id bookkeeping: a
    /// financially duplicate charge whose entry is already gone is
    /// indistinguishable from a redelivery and is only logged.
    async fn handle_confirmed(
        &self,
        payload: &str,
        currency: &str,
        amount: i64,
        charge_id: &str,
        event_chat_id: ChatId,
        event_user_id: UserId,
    ) -> Result<()> {
        let user_id = match CorrelationToken::decode(payload) {
            Ok(token) => token.u,
            Err(e) => {
                // Old clients shipped content-bearing payloads; fall
                // back to the sender identity from the event itself.
                warn!(error = %e, "confirmation payload undecodable, falling back to event user id");
                event_user_id
            }
        };

        info!(user_id, currency, amount, charge_id, "payment confirmed");

        let Some(mut pending) = self.store.take(user_id).await? else {
            warn!(
                user_id,
                charge_id, "no pending entry for confirmed payment (duplicate or superseded)"
            );
            return Ok(());
        };

        // The chat the payment message arrived in is where the user
        // is now; prefer it over the chat recorded at invoice time.
        pending.chat_id = event_chat_id;

        if let Err(e) = self
            .channel
            .send_message(pending.chat_id, PAYMENT_RECEIVED_TEXT)
            .await
        {
            warn!(user_id, error = %e, "payment acknowledgment not delivered");
        }

        self.dispatcher.fulfill(&pending).await
    }
}
