use crate::domain::card::Card;
use crate::domain::ports::ReadingOracle;
use crate::domain::reading::ReadingResult;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::fmt::Write;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-3.5-turbo";
const ORACLE_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = r#"Ты — опытный таролог. Отвечай строго в JSON-формате.

Проанализируй расклад из трёх выпавших карт и дай подробное толкование:
1. Начни с общего вступления (1-2 предложения) о посыле расклада.
2. Опиши каждую карту отдельно, в контексте вопроса (2-3 предложения),
   начиная с фразы: Карта "Название карты" говорит о...
3. Заверши общим выводом (1-2 предложения).
Названия карт всегда заключай в кавычки. Используй обращение на "вы".

Формат JSON ответа:
{
  "cards": [
    { "position": "past", "name_ru": "", "name_en": "" },
    { "position": "present", "name_ru": "", "name_en": "" },
    { "position": "future", "name_ru": "", "name_en": "" }
  ],
  "summary": [
    { "Вступление": "..." },
    { "Карта 1": "..." },
    { "Карта 2": "..." },
    { "Карта 3": "..." },
    { "Заключение": "..." }
  ]
}

Вне JSON не пиши ничего. Только строго валидный JSON."#;

/// OpenAI chat-completions adapter for the reading oracle.
#[derive(Clone)]
pub struct OpenAiOracle {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiOracle {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(BotError::Configuration("OpenAI API key is not set".into()));
        }
        let client = Client::builder()
            .timeout(ORACLE_TIMEOUT)
            .build()
            .map_err(|e| BotError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn user_prompt(question: &str, cards: &[Card; 3]) -> String {
        let mut prompt = format!("Вопрос пользователя: \"{question}\"\n\nВыпавшие карты:\n");
        for (i, card) in cards.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {}", i + 1, card.name_ru);
        }
        prompt.push_str(
            "\nПроанализируй эти карты в контексте вопроса пользователя и дай подробную расшифровку.",
        );
        prompt
    }
}

#[async_trait]
impl ReadingOracle for OpenAiOracle {
    async fn complete(&self, question: &str, cards: &[Card; 3]) -> Result<ReadingResult> {
        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::user_prompt(question, cards) },
            ],
            "max_tokens": 2000,
            "temperature": 0.7,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BotError::Oracle("oracle did not respond in time".into())
                } else {
                    BotError::Oracle(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BotError::Oracle(format!("API error (status {status}): {text}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| BotError::Oracle(format!("invalid response: {e}")))?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| BotError::Oracle("empty completion".into()))?;

        let mut result: ReadingResult = serde_json::from_str(content.trim())
            .map_err(|e| BotError::Oracle(format!("completion was not valid JSON: {e}")))?;

        // The model echoes names only; re-attach artwork from the
        // cards the user actually drew.
        for (positioned, drawn) in result.cards.iter_mut().zip(cards.iter()) {
            positioned.image = Some(drawn.image.clone());
        }

        Ok(result)
    }
}
