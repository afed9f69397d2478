use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// A single tarot card as exchanged with the mini-app and the oracle.
///
/// `name_ru` is the localized display name, `name_en` the canonical
/// one; `image` references the card artwork served by the frontend.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Card {
    pub name_ru: String,
    pub name_en: String,
    pub image: String,
}

impl Card {
    fn new(name_ru: &str, name_en: &str, image: &str) -> Self {
        Self {
            name_ru: name_ru.to_string(),
            name_en: name_en.to_string(),
            image: image.to_string(),
        }
    }
}

/// The fixed catalogue of the 22 major arcana.
pub const DECK_SIZE: usize = 22;

fn catalogue() -> [Card; DECK_SIZE] {
    [
        Card::new("Дурак", "The Fool", "m00.jpg"),
        Card::new("Маг", "The Magician", "m01.jpg"),
        Card::new("Верховная Жрица", "The High Priestess", "m02.jpg"),
        Card::new("Императрица", "The Empress", "m03.jpg"),
        Card::new("Император", "The Emperor", "m04.jpg"),
        Card::new("Иерофант", "The Hierophant", "m05.jpg"),
        Card::new("Влюбленные", "The Lovers", "m06.jpg"),
        Card::new("Колесница", "The Chariot", "m07.jpg"),
        Card::new("Сила", "Strength", "m08.jpg"),
        Card::new("Отшельник", "The Hermit", "m09.jpg"),
        Card::new("Колесо Фортуны", "Wheel of Fortune", "m10.jpg"),
        Card::new("Справедливость", "Justice", "m11.jpg"),
        Card::new("Повешенный", "The Hanged Man", "m12.jpg"),
        Card::new("Смерть", "Death", "m13.jpg"),
        Card::new("Умеренность", "Temperance", "m14.jpg"),
        Card::new("Дьявол", "The Devil", "m15.jpg"),
        Card::new("Башня", "The Tower", "m16.jpg"),
        Card::new("Звезда", "The Star", "m17.jpg"),
        Card::new("Луна", "The Moon", "m18.jpg"),
        Card::new("Солнце", "The Sun", "m19.jpg"),
        Card::new("Суд", "Judgement", "m20.jpg"),
        Card::new("Мир", "The World", "m21.jpg"),
    ]
}

/// Draws 3 distinct cards uniformly without replacement.
///
/// The order is arbitrary; past/present/future semantics are assigned
/// later by the oracle, not by the deck.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> [Card; 3] {
    let deck = catalogue();
    let picks = index::sample(rng, DECK_SIZE, 3);
    [
        deck[picks.index(0)].clone(),
        deck[picks.index(1)].clone(),
        deck[picks.index(2)].clone(),
    ]
}
