use super::reading::{ChatId, UserId};

/// The two asynchronous provider events the payment flow consumes,
/// decoupled from the transport's update envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// "Will you honor this charge" — must be answered within the
    /// provider's short deadline or the charge is auto-cancelled.
    PreCheckout { query_id: String, payload: String },
    /// Money has moved. May be delivered more than once for the same
    /// charge.
    Confirmed {
        payload: String,
        currency: String,
        amount: i64,
        charge_id: String,
        chat_id: ChatId,
        user_id: UserId,
    },
}
