//! Single-turn question answering over a document index.
//!
//! Per request: resolve index → search → branch on an empty result → build
//! prompt → generate → respond. The handler holds no mutable state, so one
//! instance can serve concurrent requests.

use crate::rag::profile::{MissPolicy, QaProfile};
use crate::search::SearchClient;
use crate::types::{Passage, QueryRequest, QueryResponse, ResponseShape};
use std::sync::Arc;
use yellow_core::AppResult;
use yellow_llm::{ChatMessage, ChatRequest, LlmClient};
use yellow_prompt::{BuiltPrompt, PromptSet};

/// Answers questions with one search call and at most one chat call.
///
/// Failures from either collaborator are returned unchanged; there are no
/// retries and no partial answers.
pub struct QueryHandler {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LlmClient>,
    profile: QaProfile,
    prompts: PromptSet,
}

impl QueryHandler {
    pub fn new(search: Arc<dyn SearchClient>, llm: Arc<dyn LlmClient>, profile: QaProfile) -> Self {
        Self {
            search,
            llm,
            profile,
            prompts: PromptSet::builtin(),
        }
    }

    /// Use a custom prompt set instead of the built-in templates.
    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn profile(&self) -> &QaProfile {
        &self.profile
    }

    /// Answer one question.
    pub async fn handle(&self, request: &QueryRequest) -> AppResult<QueryResponse> {
        let index = request.resolve(&self.profile.defaults);

        tracing::info!(
            mode = %self.profile.mode,
            index = %index,
            "Answering question"
        );

        let passages = self
            .search
            .search(
                &index,
                &request.question,
                self.profile.max_results,
                self.profile.min_score,
            )
            .await?;

        if passages.is_empty() {
            return self.handle_miss(request).await;
        }

        tracing::info!("Retrieved {} passages", passages.len());

        let context = build_context(&passages);
        tracing::debug!("Built context ({} bytes)", context.len());

        let prompt = self.prompts.build_success(
            &context,
            &request.question,
            self.profile.fallback_answer.as_deref(),
        )?;
        let answer = self.generate(prompt).await?;

        Ok(self.respond(Some(answer), Some(passages)))
    }

    async fn handle_miss(&self, request: &QueryRequest) -> AppResult<QueryResponse> {
        match self.profile.miss_policy {
            MissPolicy::ShortCircuit => {
                tracing::info!("No passages above {:.2}; skipping generation", self.profile.min_score);
                Ok(self.respond(None, None))
            }
            MissPolicy::Explain => {
                tracing::info!(
                    "No passages above {:.2}; asking the model to explain the miss",
                    self.profile.min_score
                );
                let prompt = self
                    .prompts
                    .build_miss(&request.question, self.profile.fallback_answer.as_deref())?;
                let answer = self.generate(prompt).await?;
                Ok(self.respond(Some(answer), None))
            }
        }
    }

    async fn generate(&self, prompt: BuiltPrompt) -> AppResult<String> {
        tracing::debug!(
            "Generating with {} (prompt {} v{})",
            self.profile.model,
            prompt.metadata.source_prompt_id,
            prompt.metadata.api_version
        );

        // The user turn precedes the system instruction.
        let request = ChatRequest::new(
            &self.profile.model,
            vec![
                ChatMessage::user(prompt.user),
                ChatMessage::system(prompt.system),
            ],
        )
        .with_max_tokens(self.profile.max_tokens);

        let response = self.llm.chat(&request).await?;

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        Ok(response.content)
    }

    fn respond(&self, answer: Option<String>, documents: Option<Vec<Passage>>) -> QueryResponse {
        match self.profile.shape {
            ResponseShape::WithEvidence => QueryResponse::with_evidence(answer, documents),
            ResponseShape::AnswerOnly => QueryResponse::answer_only(answer),
        }
    }
}

/// Join passage contents with newlines, in retrieval order.
pub fn build_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|passage| passage.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
