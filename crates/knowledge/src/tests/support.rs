//! In-process collaborators that record every call.

use crate::search::SearchClient;
use crate::types::{DocumentPath, IndexCoordinates, Passage};
use std::sync::Mutex;
use yellow_core::{AppError, AppResult};
use yellow_llm::{ChatRequest, ChatResponse, LlmClient, LlmUsage};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub index: IndexCoordinates,
    pub query: String,
    pub max_results: usize,
    pub min_score: f64,
}

/// Search backend returning a fixed result (or failure).
pub struct StubSearch {
    result: Result<Vec<Passage>, String>,
    calls: Mutex<Vec<SearchCall>>,
}

impl StubSearch {
    pub fn returning(passages: Vec<Passage>) -> Self {
        Self {
            result: Ok(passages),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SearchClient for StubSearch {
    async fn search(
        &self,
        index: &IndexCoordinates,
        query: &str,
        max_results: usize,
        min_score: f64,
    ) -> AppResult<Vec<Passage>> {
        self.calls.lock().unwrap().push(SearchCall {
            index: index.clone(),
            query: query.to_string(),
            max_results,
            min_score,
        });

        self.result.clone().map_err(AppError::Retrieval)
    }
}

/// Chat backend replying with a fixed answer (or failure).
pub struct RecordingChat {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingChat {
    pub fn replying(answer: &str) -> Self {
        Self {
            reply: Ok(answer.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingChat {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let content = self.reply.clone().map_err(AppError::Generation)?;
        Ok(ChatResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(100, 20),
        })
    }
}

pub fn passage(name: &str, content: &str, score: f64) -> Passage {
    Passage {
        document_path: DocumentPath {
            namespace: "Studio".to_string(),
            collection: "yellowrag".to_string(),
            name: name.to_string(),
        },
        content: content.to_string(),
        score,
        start: None,
        end: None,
    }
}
