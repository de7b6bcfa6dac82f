//! Operating modes and handler profiles.
//!
//! Two behaviourally distinct contracts share the same entry point:
//!
//! | | `evidence` | `answer-only` |
//! |---|---|---|
//! | default index | `Studio/yellowrag/yellowindex` | `Studio/papers/asym-64` |
//! | search | 3 results, score >= 0.8 | 3 results, score >= 0.5 |
//! | retrieval miss | model explains the miss | no model call, `answer = null` |
//! | response | `{answer, documents}` | `{answer}` |
//! | system instruction | persona only | persona plus a verbatim fallback answer |
//!
//! Config overrides may move the index and tune the search and generation
//! parameters, but never change the miss policy or the response shape.

use crate::types::{IndexCoordinates, ResponseShape};
use yellow_core::config::DEFAULT_MODEL;
use yellow_core::{AppError, AppResult, QaSettings};

pub const DEFAULT_NAMESPACE: &str = "Studio";
pub const EVIDENCE_COLLECTION: &str = "yellowrag";
pub const EVIDENCE_INDEX: &str = "yellowindex";
pub const ANSWER_ONLY_COLLECTION: &str = "papers";
pub const ANSWER_ONLY_INDEX: &str = "asym-64";

pub const DEFAULT_MAX_RESULTS: usize = 3;
pub const EVIDENCE_MIN_SCORE: f64 = 0.8;
pub const ANSWER_ONLY_MIN_SCORE: f64 = 0.5;
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Sentence the model must return in answer-only mode when the retrieved
/// documents do not address the question.
pub const FALLBACK_ANSWER: &str = "What are you going on about, you hamster.";

/// Named operating mode, selected by deployment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    /// Returns retrieved evidence and always calls the model.
    #[default]
    Evidence,
    /// Returns only the answer and skips the model on a retrieval miss.
    AnswerOnly,
}

impl OperatingMode {
    /// Parse a mode name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "evidence" | "a" => Some(Self::Evidence),
            "answer-only" | "answer_only" | "b" => Some(Self::AnswerOnly),
            _ => None,
        }
    }

    /// Canonical mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evidence => "evidence",
            Self::AnswerOnly => "answer-only",
        }
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the handler does when search returns no passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    /// Ask the model to explain why the knowledge base could not answer.
    Explain,
    /// Return `answer = None` without calling the model.
    ShortCircuit,
}

/// Complete, immutable configuration of one query handler.
#[derive(Debug, Clone, PartialEq)]
pub struct QaProfile {
    pub mode: OperatingMode,
    pub defaults: IndexCoordinates,
    pub max_results: usize,
    pub min_score: f64,
    pub model: String,
    pub max_tokens: u32,
    pub miss_policy: MissPolicy,
    pub shape: ResponseShape,
    pub fallback_answer: Option<String>,
}

impl QaProfile {
    /// Built-in profile for a mode.
    pub fn for_mode(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Evidence => Self {
                mode,
                defaults: IndexCoordinates::new(
                    DEFAULT_NAMESPACE,
                    EVIDENCE_COLLECTION,
                    EVIDENCE_INDEX,
                ),
                max_results: DEFAULT_MAX_RESULTS,
                min_score: EVIDENCE_MIN_SCORE,
                model: DEFAULT_MODEL.to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                miss_policy: MissPolicy::Explain,
                shape: ResponseShape::WithEvidence,
                fallback_answer: None,
            },
            OperatingMode::AnswerOnly => Self {
                mode,
                defaults: IndexCoordinates::new(
                    DEFAULT_NAMESPACE,
                    ANSWER_ONLY_COLLECTION,
                    ANSWER_ONLY_INDEX,
                ),
                max_results: DEFAULT_MAX_RESULTS,
                min_score: ANSWER_ONLY_MIN_SCORE,
                model: DEFAULT_MODEL.to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                miss_policy: MissPolicy::ShortCircuit,
                shape: ResponseShape::AnswerOnly,
                fallback_answer: Some(FALLBACK_ANSWER.to_string()),
            },
        }
    }

    /// Resolve a profile from config: mode first, then field overrides.
    pub fn from_settings(settings: &QaSettings) -> AppResult<Self> {
        let mode = match settings.mode.as_deref() {
            Some(name) => OperatingMode::parse(name).ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown operating mode: {}. Supported: evidence, answer-only",
                    name
                ))
            })?,
            None => OperatingMode::default(),
        };

        let profile = Self::for_mode(mode).with_settings(settings);
        profile.validate()?;
        Ok(profile)
    }

    /// Apply field overrides. `settings.mode` is ignored here.
    pub fn with_settings(mut self, settings: &QaSettings) -> Self {
        if let Some(ref namespace) = settings.namespace {
            self.defaults.namespace = namespace.clone();
        }
        if let Some(ref collection) = settings.collection {
            self.defaults.collection = collection.clone();
        }
        if let Some(ref index) = settings.index {
            self.defaults.index = index.clone();
        }
        if let Some(max_results) = settings.max_results {
            self.max_results = max_results;
        }
        if let Some(min_score) = settings.min_score {
            self.min_score = min_score;
        }
        if let Some(ref model) = settings.model {
            self.model = model.clone();
        }
        if let Some(max_tokens) = settings.max_tokens {
            self.max_tokens = max_tokens;
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_results == 0 {
            return Err(AppError::Config(
                "maxResults must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(AppError::Config(format!(
                "minScore must be between 0 and 1, got {}",
                self.min_score
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model cannot be empty".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(AppError::Config(
                "maxTokens must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
