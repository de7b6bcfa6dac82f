//! Request, passage and response types for the query handler.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Address of a searchable document index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexCoordinates {
    pub namespace: String,
    pub collection: String,
    pub index: String,
}

impl IndexCoordinates {
    pub fn new(
        namespace: impl Into<String>,
        collection: impl Into<String>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            collection: collection.into(),
            index: index.into(),
        }
    }
}

impl std::fmt::Display for IndexCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.collection, self.index)
    }
}

/// Inbound call contract. Location fields fall back to the operating mode's
/// defaults when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            namespace: None,
            collection: None,
            index: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Fill missing location fields from `defaults`. No I/O, no validation.
    pub fn resolve(&self, defaults: &IndexCoordinates) -> IndexCoordinates {
        IndexCoordinates {
            namespace: self
                .namespace
                .clone()
                .unwrap_or_else(|| defaults.namespace.clone()),
            collection: self
                .collection
                .clone()
                .unwrap_or_else(|| defaults.collection.clone()),
            index: self.index.clone().unwrap_or_else(|| defaults.index.clone()),
        }
    }
}

/// Document a passage was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPath {
    pub namespace: String,
    pub collection: String,
    pub name: String,
}

/// Position inside a document's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCursor {
    pub item: u32,
    pub position: u32,
}

/// A scored unit of retrieved text. Passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub document_path: DocumentPath,
    pub content: String,
    pub score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<TextCursor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<TextCursor>,
}

/// Which fields a response exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{answer, documents}`; `documents` is null on a retrieval miss
    WithEvidence,
    /// `{answer}` only
    AnswerOnly,
}

/// Result of one handled question.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub answer: Option<String>,
    pub documents: Option<Vec<Passage>>,
    pub shape: ResponseShape,
}

impl QueryResponse {
    /// Answer with the exact search result attached.
    pub fn with_evidence(answer: Option<String>, documents: Option<Vec<Passage>>) -> Self {
        Self {
            answer,
            documents,
            shape: ResponseShape::WithEvidence,
        }
    }

    pub fn answer_only(answer: Option<String>) -> Self {
        Self {
            answer,
            documents: None,
            shape: ResponseShape::AnswerOnly,
        }
    }
}

impl Serialize for QueryResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.shape {
            ResponseShape::WithEvidence => {
                let mut state = serializer.serialize_struct("QueryResponse", 2)?;
                state.serialize_field("answer", &self.answer)?;
                state.serialize_field("documents", &self.documents)?;
                state.end()
            }
            ResponseShape::AnswerOnly => {
                let mut state = serializer.serialize_struct("QueryResponse", 1)?;
                state.serialize_field("answer", &self.answer)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn passage(content: &str, score: f64) -> Passage {
        Passage {
            document_path: DocumentPath {
                namespace: "Studio".to_string(),
                collection: "yellowrag".to_string(),
                name: "policy.pdf".to_string(),
            },
            content: content.to_string(),
            score,
            start: None,
            end: None,
        }
    }

    #[test]
    fn test_resolve_uses_defaults_for_missing_fields() {
        let defaults = IndexCoordinates::new("Studio", "yellowrag", "yellowindex");
        let request = QueryRequest::new("q").with_collection("contracts");

        let resolved = request.resolve(&defaults);
        assert_eq!(resolved, IndexCoordinates::new("Studio", "contracts", "yellowindex"));
        assert_eq!(resolved.to_string(), "Studio/contracts/yellowindex");
    }

    #[test]
    fn test_resolve_keeps_empty_overrides() {
        let defaults = IndexCoordinates::new("Studio", "yellowrag", "yellowindex");
        let request = QueryRequest::new("q").with_namespace("");

        assert_eq!(request.resolve(&defaults).namespace, "");
    }

    #[test]
    fn test_request_deserializes_with_only_question() {
        let request: QueryRequest =
            serde_json::from_value(json!({"question": "What is GDPR?"})).unwrap();
        assert_eq!(request, QueryRequest::new("What is GDPR?"));
    }

    #[test]
    fn test_evidence_shape_serializes_null_documents() {
        let response = QueryResponse::with_evidence(Some("a".to_string()), None);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"answer": "a", "documents": null}));
    }

    #[test]
    fn test_evidence_shape_serializes_documents() {
        let response =
            QueryResponse::with_evidence(Some("a".to_string()), Some(vec![passage("Clause 7", 0.91)]));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["documents"][0]["content"], "Clause 7");
        assert_eq!(value["documents"][0]["score"], 0.91);
        assert_eq!(value["documents"][0]["document_path"]["name"], "policy.pdf");
        assert!(value["documents"][0].get("start").is_none());
    }

    #[test]
    fn test_answer_only_shape_omits_documents() {
        let value = serde_json::to_value(QueryResponse::answer_only(None)).unwrap();
        assert_eq!(value, json!({"answer": null}));
    }
}
