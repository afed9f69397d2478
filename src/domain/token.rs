use super::reading::UserId;
use crate::error::{BotError, Result};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hard ceiling the payment provider imposes on the invoice payload.
pub const MAX_PAYLOAD_BYTES: usize = 128;

/// The opaque value round-tripped through the payment provider.
///
/// The full request (question plus three cards) does not fit in the
/// payload budget, so the token carries only the lookup key: content
/// stays server-side in the pending store and is recovered by user id
/// when the confirmation event arrives.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct CorrelationToken {
    /// Requester user id.
    pub u: UserId,
    /// Issue time, unix millis.
    pub t: i64,
}

impl CorrelationToken {
    pub fn new(user_id: UserId, issued_at: i64) -> Self {
        Self {
            u: user_id,
            t: issued_at,
        }
    }

    /// Serializes the token, failing loudly if the encoded form would
    /// exceed the provider ceiling. Truncation is never an option:
    /// a truncated token would silently break correlation.
    pub fn encode(&self) -> Result<String> {
        let payload = serde_json::to_string(self)
            .map_err(|e| BotError::Configuration(format!("token encoding failed: {e}")))?;
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(BotError::Configuration(format!(
                "token payload is {} bytes, provider limit is {MAX_PAYLOAD_BYTES}",
                payload.len()
            )));
        }
        Ok(payload)
    }

    pub fn decode(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| BotError::Validation(format!("undecodable token payload: {e}")))
    }
}

/// Current unix time in milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
