//! Optional AI cleanup of extracted PDF text
//!
//! Text is sent to an OpenAI-compatible chat-completions endpoint in chunks
//! of at most `max-chunk-chars` characters, split on line boundaries.

use crate::config::AiConfig;
use crate::extract::clean::clean_text;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const SYSTEM_PROMPT: &str = "You clean text extracted from PDF documents. \
Fix broken words and line breaks, remove page headers, footers and page numbers, \
and keep the original language and meaning. Respond with the cleaned text only.";

#[derive(Debug, Error)]
pub enum RefineError {
    #[error("AI request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("AI service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("AI service returned no content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
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
    #[serde(default)]
    content: Option<String>,
}

pub struct TextRefiner {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_chunk_chars: usize,
}

impl TextRefiner {
    pub fn new(config: &AiConfig, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.to_string(),
            max_chunk_chars: config.max_chunk_chars,
        })
    }

    /// Refines text chunk by chunk; any failed chunk fails the whole call
    pub async fn refine(&self, text: &str) -> Result<String, RefineError> {
        let chunks = chunk_text(text, self.max_chunk_chars);
        let mut refined = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(
                "Refining chunk {}/{} ({} chars)",
                index + 1,
                chunks.len(),
                chunk.chars().count()
            );
            refined.push(self.complete(chunk).await?);
        }

        let text = clean_text(&refined.join("\n"));
        if text.is_empty() {
            return Err(RefineError::EmptyResponse);
        }
        Ok(text)
    }

    async fn complete(&self, chunk: &str) -> Result<String, RefineError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: chunk,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefineError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(RefineError::EmptyResponse)
    }
}

/// Splits text into chunks of at most `max_chars` characters
///
/// Lines are kept whole when they fit; longer lines are split on character
/// boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();

        if line_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = line.chars().collect();
            chunks.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let needed = if current.is_empty() { line_len } else { line_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
