use crate::domain::card::Card;
use crate::domain::ports::ReadingOracle;
use crate::domain::reading::{Position, PositionedCard, ReadingResult, SummarySection};
use crate::error::Result;
use async_trait::async_trait;

/// Deterministic stand-in oracle used when no OpenAI key is
/// configured. Assigns positions to the drawn cards in order and
/// returns fixed interpretation text.
#[derive(Default, Clone)]
pub struct CannedOracle;

impl CannedOracle {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReadingOracle for CannedOracle {
    async fn complete(&self, _question: &str, cards: &[Card; 3]) -> Result<ReadingResult> {
        let positions = [Position::Past, Position::Present, Position::Future];
        let positioned = positions
            .into_iter()
            .zip(cards.iter())
            .map(|(position, card)| PositionedCard {
                position,
                name_ru: card.name_ru.clone(),
                name_en: card.name_en.clone(),
                image: Some(card.image.clone()),
            })
            .collect();

        Ok(ReadingResult {
            cards: positioned,
            summary: vec![
                SummarySection::new(
                    "Прошлое",
                    "В прошлом вы были открыты новым возможностям, и этот опыт заложил основу происходящего.",
                ),
                SummarySection::new(
                    "Настоящее",
                    "Сейчас у вас есть все необходимые инструменты и навыки для достижения целей.",
                ),
                SummarySection::new(
                    "Будущее",
                    "В будущем вас ждет глубокое понимание скрытых истин — доверьтесь интуиции.",
                ),
                SummarySection::new(
                    "Совет",
                    "Доверьтесь внутреннему голосу и сохраняйте баланс между логикой и интуицией.",
                ),
            ],
        })
    }
}
