//! Document search abstraction.
//!
//! The handler only needs one call: given index coordinates, a query, a
//! result limit and a minimum relevance score, return scored passages. An
//! empty result is a normal outcome, never an error.

use crate::types::{DocumentPath, IndexCoordinates, Passage, TextCursor};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use yellow_core::{AppError, AppResult};

/// Trait for document search backends.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Search `index` for passages relevant to `query`.
    ///
    /// Returns at most `max_results` passages with a score of at least
    /// `min_score`, ordered as the backend ranks them.
    async fn search(
        &self,
        index: &IndexCoordinates,
        query: &str,
        max_results: usize,
        min_score: f64,
    ) -> AppResult<Vec<Passage>>;
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    query: Vec<Modality<'a>>,
    max_results: usize,
    min_score: f64,
}

#[derive(Debug, Serialize)]
struct Modality<'a> {
    modality: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    document_path: DocumentPath,
    section: Vec<SectionItem>,
    score: f64,
    #[serde(default)]
    start: Option<TextCursor>,
    #[serde(default)]
    end: Option<TextCursor>,
}

#[derive(Debug, Deserialize)]
struct SectionItem {
    modality: String,
    #[serde(default)]
    text: Option<String>,
}

impl From<SearchHit> for Passage {
    fn from(hit: SearchHit) -> Self {
        let content = hit
            .section
            .into_iter()
            .filter(|item| item.modality == "text")
            .filter_map(|item| item.text)
            .collect::<Vec<_>>()
            .join("");

        Passage {
            document_path: hit.document_path,
            content,
            score: hit.score,
            start: hit.start,
            end: hit.end,
        }
    }
}

/// HTTP client for a document index service.
///
/// Searches via
/// `POST {base}/collections/{namespace}/{collection}/indexes/{index}/search`.
pub struct DocumentIndexClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl DocumentIndexClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Authenticate every request with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn search_url(&self, index: &IndexCoordinates) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::Retrieval(format!("Invalid search endpoint {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::Retrieval(format!("Search endpoint cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend([
                "collections",
                index.namespace.as_str(),
                index.collection.as_str(),
                "indexes",
                index.index.as_str(),
                "search",
            ]);

        Ok(url)
    }
}

#[async_trait::async_trait]
impl SearchClient for DocumentIndexClient {
    async fn search(
        &self,
        index: &IndexCoordinates,
        query: &str,
        max_results: usize,
        min_score: f64,
    ) -> AppResult<Vec<Passage>> {
        let url = self.search_url(index)?;
        tracing::debug!(%url, max_results, min_score, "Searching document index");

        let body = SearchBody {
            query: vec![Modality {
                modality: "text",
                text: query,
            }],
            max_results,
            min_score,
        };

        let mut request = self.client.post(url).json(&body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::Retrieval(format!("Failed to send search request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Document index error ({}) for {}: {}",
                status, index, error_text
            )));
        }

        let hits: Vec<SearchHit> = response.json().await.map_err(|e| {
            AppError::Retrieval(format!("Failed to parse search response: {}", e))
        })?;

        Ok(hits.into_iter().map(Passage::from).collect())
    }
}
