use crate::domain::ports::{DeliveryChannelRef, ReadingOracleRef};
use crate::domain::reading::{PendingReading, ReadingResult};
use crate::error::Result;
use std::fmt::Write;
use tracing::{error, info};

/// Sent when the oracle fails after payment. The money is already
/// captured, so the failure must surface for manual remediation
/// instead of being retried or swallowed.
const APOLOGY_TEXT: &str = "❌ Произошла ошибка при выполнении гадания.\n\
    Пожалуйста, свяжитесь с поддержкой для возврата средств.";

/// Invokes the oracle for a claimed pending entry and delivers the
/// outcome. Both fulfillment triggers (payment confirmation and the
/// status endpoint) funnel through this type, so the exactly-once
/// guarantee lives in one place: whoever `take`s the entry calls here,
/// and only once.
pub struct FulfillmentDispatcher {
    oracle: ReadingOracleRef,
    channel: DeliveryChannelRef,
}

impl FulfillmentDispatcher {
    pub fn new(oracle: ReadingOracleRef, channel: DeliveryChannelRef) -> Self {
        Self { oracle, channel }
    }

    /// Runs the oracle for an already-claimed entry. No retry on
    /// failure; the caller decides how the error surfaces.
    pub async fn read(&self, pending: &PendingReading) -> Result<ReadingResult> {
        self.oracle
            .complete(&pending.question, &pending.cards)
            .await
    }

    /// Runs the oracle and delivers the formatted result to the
    /// originating chat, or an apology on oracle failure. Terminal
    /// either way.
    pub async fn fulfill(&self, pending: &PendingReading) -> Result<()> {
        match self.read(pending).await {
            Ok(result) => {
                let text = format_reading(&pending.question, &result);
                self.channel.send_message(pending.chat_id, &text).await?;
                info!(user_id = pending.user_id, "reading delivered");
                Ok(())
            }
            Err(e) => {
                error!(user_id = pending.user_id, error = %e, "oracle call failed, notifying user");
                self.channel
                    .send_message(pending.chat_id, APOLOGY_TEXT)
                    .await?;
                Err(e)
            }
        }
    }
}

/// Renders the oracle output as the Markdown message sent to the chat.
pub fn format_reading(question: &str, result: &ReadingResult) -> String {
    let mut text = String::new();
    let _ = write!(text, "🔮 *Ваш расклад Таро*\n\n📝 Вопрос: _{question}_\n\n");

    if !result.cards.is_empty() {
        text.push_str("🃏 *Выпавшие карты:*\n");
        for (i, card) in result.cards.iter().enumerate() {
            let name = if card.name_ru.is_empty() {
                &card.name_en
            } else {
                &card.name_ru
            };
            let _ = writeln!(text, "{}. {}: {}", i + 1, card.position.label_ru(), name);
        }
        text.push('\n');
    }

    if !result.summary.is_empty() {
        text.push_str("📖 *Толкование:*\n\n");
        for section in &result.summary {
            let _ = write!(text, "{}\n\n", section.text);
        }
    }

    text
}
