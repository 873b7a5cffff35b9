// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted VLM client for text extraction via an OpenAI-compatible API

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

/// Model used for every extraction request
pub const OCR_MODEL: &str = "meta-llama/Llama-3.2-11B-Vision-Instruct";

/// Output token budget for every extraction request
pub const OCR_MAX_TOKENS: u32 = 3000;

const SYSTEM_PROMPT: &str = "You are an expert in extracting text inside given images. Give the text inside the image given by the user.";

const USER_PROMPT: &str = "Give me the text inside the image";

// --- OpenAI-compatible serde structs ---

#[derive(Debug, serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Errors from the inference provider
#[derive(Debug, Error)]
pub enum VlmError {
    /// The call succeeded but carried no usable choice
    #[error("No valid content received in response")]
    EmptyResponse,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("inference provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse inference provider response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Result from VLM-based text extraction
#[derive(Debug, Clone)]
pub struct VlmOcrResult {
    /// First choice's content, `None` when the provider sent `null`
    pub text: Option<String>,
    pub model: String,
    pub processing_time_ms: u64,
    pub tokens_used: u32,
}

/// Something that can read the text out of a prepared image
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from a `data:image/jpeg;base64,...` URL
    async fn extract_text(&self, image_data_url: &str) -> Result<VlmOcrResult, VlmError>;
}

/// Client for a hosted vision-language model behind a chat-completions API
pub struct VlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl VlmClient {
    /// Create a new VLM client
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder().build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("VLM client configured: endpoint={}, model={}", endpoint, OCR_MODEL);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    /// Get the provider base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl TextExtractor for VlmClient {
    async fn extract_text(&self, image_data_url: &str) -> Result<VlmOcrResult, VlmError> {
        let start = std::time::Instant::now();

        let request = ChatRequest {
            model: OCR_MODEL.to_string(),
            messages: build_messages(image_data_url),
            max_tokens: OCR_MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!("VLM provider error {}: {}", status, body);
            return Err(VlmError::Status { status, body });
        }

        let (text, tokens_used) = parse_completion(&body)?;

        Ok(VlmOcrResult {
            text,
            model: OCR_MODEL.to_string(),
            processing_time_ms: start.elapsed().as_millis() as u64,
            tokens_used,
        })
    }
}

fn build_messages(image_data_url: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: serde_json::Value::String(SYSTEM_PROMPT.to_string()),
        },
        ChatMessage {
            role: "user".to_string(),
            content: serde_json::json!([
                {"type": "image_url", "image_url": {"url": image_data_url}},
                {"type": "text", "text": USER_PROMPT}
            ]),
        },
    ]
}

/// Pull the first choice's content and the token count out of a raw
/// response body.
///
/// A `null` body or a missing or empty `choices` list counts as an empty
/// response. The first choice's content is passed through as-is, `null`
/// included.
fn parse_completion(body: &str) -> Result<(Option<String>, u32), VlmError> {
    let response: ChatResponse =
        serde_json::from_str::<Option<ChatResponse>>(body)?.ok_or(VlmError::EmptyResponse)?;
    let tokens_used = response.usage.map(|u| u.total_tokens).unwrap_or(0);
    let choice = response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .ok_or(VlmError::EmptyResponse)?;
    Ok((choice.message.content, tokens_used))
}
