//! Flashcard generation from transcripts.
//!
//! Sends each transcript to a chat-completion endpoint with a summarization
//! prompt, parses the numbered key points and quote bullets out of the
//! response, and exports the accumulated results as an Anki CSV.

mod export;
mod parse;
mod results;

pub use export::{collect_rows, write_csv, FlashcardRow};
pub use parse::parse_key_points;
pub use results::CardResults;

use crate::catalog::Episode;
use crate::config::{CardSettings, Prompts};
use crate::error::{LyttekortError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// A key point with its supporting quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub text: String,
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// Generates flashcard material for one episode at a time.
pub struct CardGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_key_points: usize,
    max_quotes_per_point: usize,
    prompts: Prompts,
}

impl CardGenerator {
    /// Create a generator from the card settings.
    pub fn new(settings: &CardSettings, model_override: Option<String>) -> Self {
        Self {
            client: create_client(),
            model: model_override.unwrap_or_else(|| settings.model.clone()),
            max_key_points: settings.max_key_points,
            max_quotes_per_point: settings.max_quotes_per_point,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Summarize one transcript into key points.
    #[instrument(skip(self, episode, transcript), fields(episode_id = %episode.id))]
    pub async fn generate(&self, episode: &Episode, transcript: &str) -> Result<Vec<KeyPoint>> {
        info!("Summarizing '{}'", episode.episode_title);

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());
        vars.insert("episode_title".to_string(), episode.episode_title.clone());
        vars.insert("podcast_title".to_string(), episode.podcast_title.clone());
        vars.insert("max_points".to_string(), self.max_key_points.to_string());
        vars.insert(
            "max_quotes".to_string(),
            self.max_quotes_per_point.to_string(),
        );

        let system_message = self
            .prompts
            .render_with_custom(&self.prompts.cards.system, &vars);
        let user_message = self
            .prompts
            .render_with_custom(&self.prompts.cards.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| LyttekortError::Cards(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| LyttekortError::Cards(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.3)
            .build()
            .map_err(|e| LyttekortError::Cards(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            LyttekortError::OpenAI(format!("Failed to summarize transcript: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| LyttekortError::Cards("Empty response from LLM".to_string()))?;

        debug!("LLM response: {}", &content[..content.len().min(500)]);

        let points = parse_key_points(content, self.max_key_points, self.max_quotes_per_point);
        if points.is_empty() {
            return Err(LyttekortError::Cards(format!(
                "Response contained no numbered key points for '{}'",
                episode.episode_title
            )));
        }

        info!("Extracted {} key points", points.len());
        Ok(points)
    }
}
