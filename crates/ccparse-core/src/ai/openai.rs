//! `OpenAI` chat-completions extraction service.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{EXTRACTION_PROMPT, ExtractionService, StatementFields};
use crate::error::AiError;
use crate::models::config::AiConfig;

/// Extraction service backed by the `OpenAI` chat-completions API.
///
/// The statement PDF travels inline as a base64 `file` content part next to
/// the field-schema prompt.
pub struct OpenAiService {
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiService {
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl ExtractionService for OpenAiService {
    async fn extract(&self, document: &[u8], filename: &str) -> Result<StatementFields, AiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    json!({ "type": "text", "text": EXTRACTION_PROMPT }),
                    json!({
                        "type": "file",
                        "file": {
                            "filename": filename,
                            "file_data": format!("data:application/pdf;base64,{}", STANDARD.encode(document)),
                        }
                    }),
                ],
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("Sending {} ({} bytes) to {}", filename, document.len(), self.model);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|err| err.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}: {body}"));
            return Err(AiError::Provider { message });
        }

        let response: ChatResponse = serde_json::from_str(&body)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::Provider {
                message: "No content in OpenAI response".to_string(),
            })?;

        parse_reply(&content)
    }
}

/// Parse the model reply, tolerating markdown code fences.
fn parse_reply(content: &str) -> Result<StatementFields, AiError> {
    let json = strip_fences(content);
    Ok(serde_json::from_str(json)?)
}

fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
