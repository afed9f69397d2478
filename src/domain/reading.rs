use super::card::Card;
use crate::error::BotError;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Telegram user identifier. Stable across the whole flow and the
/// primary key of the pending store.
pub type UserId = i64;

/// Telegram chat identifier used to address the delivery channel.
pub type ChatId = i64;

/// A reading request awaiting payment confirmation. At most one live
/// entry per user; a newer request overwrites the older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReading {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub question: String,
    pub cards: [Card; 3],
    /// Unix millis at invoice time. Kept for staleness diagnostics,
    /// not enforced as an expiry.
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Past,
    Present,
    Future,
}

impl Position {
    pub fn label_ru(self) -> &'static str {
        match self {
            Position::Past => "Прошлое",
            Position::Present => "Настоящее",
            Position::Future => "Будущее",
        }
    }
}

/// One card of the oracle output, with its assigned spread position.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct PositionedCard {
    pub position: Position,
    pub name_ru: String,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
}

/// One labeled prose section of the interpretation.
///
/// The wire format is a single-entry JSON object, e.g.
/// `{"Вступление": "..."}`, so serialization is hand-rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub label: String,
    pub text: String,
}

impl SummarySection {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl Serialize for SummarySection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.label, &self.text)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for SummarySection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SectionVisitor;

        impl<'de> Visitor<'de> for SectionVisitor {
            type Value = SummarySection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a single-entry map of section label to text")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (label, text): (String, String) = access
                    .next_entry()?
                    .ok_or_else(|| de::Error::custom("empty summary section"))?;
                // Trailing entries are ignored, matching the reference
                // behavior of reading the first key only.
                while access
                    .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                    .is_some()
                {}
                Ok(SummarySection { label, text })
            }
        }

        deserializer.deserialize_map(SectionVisitor)
    }
}

/// Structured oracle output: the three positioned cards plus the
/// ordered interpretation sections.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct ReadingResult {
    pub cards: Vec<PositionedCard>,
    pub summary: Vec<SummarySection>,
}

/// Converts a wire-level card list into the fixed spread size,
/// rejecting anything that is not exactly 3 cards.
pub fn spread_of(cards: Vec<Card>) -> Result<[Card; 3], BotError> {
    let len = cards.len();
    cards
        .try_into()
        .map_err(|_| BotError::Validation(format!("expected exactly 3 cards, got {len}")))
}
