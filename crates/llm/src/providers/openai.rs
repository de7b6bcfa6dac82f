//! OpenAI-compatible chat provider.
//!
//! Targets any service exposing `POST {base}/chat/completions` with the
//! OpenAI request/response schema, which is how hosted inference platforms
//! serve instruction-tuned models such as `llama-3.3-70b-instruct`.

use crate::client::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmUsage};
use serde::Deserialize;
use yellow_core::{AppError, AppResult};

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: String,
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI-compatible chat client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    organization: Option<String>,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_OPENAI_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            organization: None,
            client: reqwest::Client::new(),
        }
    }

    /// Send `OpenAI-Organization` with every request.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    fn request_builder(&self, request: &ChatRequest) -> reqwest::RequestBuilder {
        let url = format!("{}/chat/completions", self.base_url);

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(ref organization) = self.organization {
            builder = builder.header(ORGANIZATION_HEADER, organization);
        }
        builder
    }

    fn convert_response(&self, response: CompletionResponse) -> AppResult<ChatResponse> {
        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AppError::Generation("Completion response contained no choices".to_string())
        })?;

        Ok(ChatResponse {
            content: choice.message.content,
            model: response.model,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::info!(model = %request.model, "Sending chat completion request");
        tracing::debug!("Request: {:?}", request);

        let response = self
            .request_builder(request)
            .send()
            .await
            .map_err(|e| {
                AppError::Generation(format!("Failed to send chat completion request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generation(format!(
                "Chat completion API error ({}): {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            AppError::Generation(format!("Failed to parse chat completion response: {}", e))
        })?;

        tracing::info!("Received chat completion");
        tracing::debug!("Response: {:?}", completion);

        self.convert_response(completion)
    }
}
