use crate::ai::client::OpenRouterClient;
use crate::error::ContentError;
use crate::models::{BilingualPair, Difficulty, Language};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Used when the user leaves the item count blank.
pub const DEFAULT_ITEM_COUNT: usize = 20;

const SYSTEM_PROMPT: &str = "You are a multilingual assistant proficient in English and multiple other languages. \
Provide responses in a JSON format compatible with the given schema.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub topic: String,
    pub count: usize,
    pub difficulty: Difficulty,
    pub language: Language,
}

impl ContentRequest {
    /// Validates raw form input. A blank count means [`DEFAULT_ITEM_COUNT`].
    pub fn new(
        topic: &str,
        count: &str,
        difficulty: Difficulty,
        language: Language,
    ) -> Result<Self, ContentError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ContentError::EmptyTopic);
        }

        let count = count.trim();
        let count = if count.is_empty() {
            info!("Number of items not provided. Defaulting to {}", DEFAULT_ITEM_COUNT);
            DEFAULT_ITEM_COUNT
        } else {
            // digits only: `parse` alone would accept "+5"
            let parsed = count
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| count.parse::<usize>().ok())
                .flatten();
            match parsed {
                Some(n) if n > 0 => n,
                _ => return Err(ContentError::InvalidCount(count.to_string())),
            }
        };

        Ok(Self {
            topic: topic.to_string(),
            count,
            difficulty,
            language,
        })
    }

    pub fn user_prompt(&self) -> String {
        format!(
            "Provide two lists (original untranslated - translated) to teach the language related to the concept '{}' which is an explicit request from the user. \
Generate {} items for each list: English items (untranslated) and their translations into the target language. \
The items can be words, phrases, or sentences; depending on the request. Just anything typical to tutor the user. \
The items are either in-first-person saying or general words/phrases/sentences. \
Provide letters as items if alphabet is requested. \
Difficulty level: '{}', adjust your response accordingly. \
Target language: '{}'.

Respond ONLY with this exact JSON structure (no markdown, no extra text):
{{
    \"untranslated_words\": [\"english item\", ...],
    \"translated_words\": [\"translated item\", ...]
}}",
            self.topic,
            self.count,
            self.difficulty.label(),
            self.language.code()
        )
    }
}

/// Produces bilingual pairs for a topic.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// May return fewer pairs than requested.
    async fn generate(&self, request: &ContentRequest) -> Result<Vec<BilingualPair>, ContentError>;
}

pub struct LlmContentProvider {
    client: OpenRouterClient,
}

impl LlmContentProvider {
    pub fn new(client: OpenRouterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentProvider for LlmContentProvider {
    async fn generate(&self, request: &ContentRequest) -> Result<Vec<BilingualPair>, ContentError> {
        info!(
            "Requesting {} items about '{}' in {} ({}) from {}",
            request.count,
            request.topic,
            request.language.display_name(),
            request.difficulty,
            self.client.model()
        );
        let response = self
            .client
            .complete(SYSTEM_PROMPT, &request.user_prompt())
            .await?;
        debug!("Raw LLM response: {}", response);

        let pairs = parse_bilingual_response(&response)?;
        if pairs.is_empty() {
            return Err(ContentError::Empty);
        }
        info!("Received {} pairs for '{}'", pairs.len(), request.topic);
        Ok(pairs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BilingualDict {
    untranslated_words: Vec<String>,
    translated_words: Vec<String>,
}

fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find('{')
        && let Some(end) = cleaned.rfind('}')
        && start < end
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

/// Pairs the two lists position by position. Surplus items on the longer list
/// and pairs with a blank side are dropped.
pub fn parse_bilingual_response(response: &str) -> Result<Vec<BilingualPair>, ContentError> {
    let cleaned = clean_json_response(response);
    let dict: BilingualDict = serde_json::from_str(&cleaned)
        .map_err(|e| ContentError::Parse(format!("{}\nRaw: {}", e, response)))?;

    if dict.untranslated_words.len() != dict.translated_words.len() {
        warn!(
            "List length mismatch: {} untranslated vs {} translated, extra items dropped",
            dict.untranslated_words.len(),
            dict.translated_words.len()
        );
    }

    let pairs: Vec<BilingualPair> = dict
        .untranslated_words
        .iter()
        .zip(dict.translated_words.iter())
        .filter_map(|(source, target)| BilingualPair::new(source, target))
        .collect();

    Ok(pairs)
}
