//! Prompt types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A versioned prompt template, built in or loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Unique prompt identifier (e.g. "qa.success")
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

impl PromptTemplate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        api_version: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            api_version: api_version.into(),
            created_by: String::new(),
            template: template.into(),
        }
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System instruction
    pub system: String,

    /// User message
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Template used for the user message
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Version of that template
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}
