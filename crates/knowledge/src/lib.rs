//! Retrieval-augmented question answering.
//!
//! Answers one question per call by searching a document index and asking a
//! chat model to compose a grounded answer. See [`rag::QueryHandler`].

pub mod rag;
pub mod search;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use rag::{MissPolicy, OperatingMode, QaProfile, QueryHandler};
pub use search::{DocumentIndexClient, SearchClient};
pub use types::{
    DocumentPath, IndexCoordinates, Passage, QueryRequest, QueryResponse, ResponseShape,
    TextCursor,
};

use std::sync::Arc;
use yellow_core::{AppConfig, AppError, AppResult};
use yellow_prompt::PromptSet;

/// Build a query handler from resolved application config.
///
/// `mode` overrides the configured operating mode. Prompt overrides are read
/// from the workspace's `.yellow/prompts/` directory.
pub fn build_handler(config: &AppConfig, mode: Option<OperatingMode>) -> AppResult<QueryHandler> {
    let mut settings = config.qa.clone();
    if let Some(mode) = mode {
        settings.mode = Some(mode.as_str().to_string());
    }

    let profile = QaProfile::from_settings(&settings)?.with_model(&config.model);
    profile.validate()?;

    tracing::info!(
        "Query handler: mode={}, index={}, model={}, max_results={}, min_score={}",
        profile.mode,
        profile.defaults,
        profile.model,
        profile.max_results,
        profile.min_score
    );

    let mut search = DocumentIndexClient::new(&config.search.endpoint);
    if let Some(token) = config.search.resolve_token() {
        search = search.with_token(token);
    }

    let api_key = config.resolve_api_key(&config.provider);
    let organization = config.resolve_organization(&config.provider);
    let llm = yellow_llm::create_client(
        &config.provider,
        config.provider_endpoint(),
        api_key.as_deref(),
        organization.as_deref(),
    )
    .map_err(AppError::Config)?;

    let prompts = PromptSet::load(&config.prompts_dir())?;

    Ok(QueryHandler::new(Arc::new(search), llm, profile).with_prompts(prompts))
}
