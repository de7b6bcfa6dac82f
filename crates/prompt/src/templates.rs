//! Built-in prompt templates.
//!
//! Bump a template's `apiVersion` whenever its text changes; snapshot tests
//! pin the rendered output of each version.

use crate::types::PromptTemplate;

pub const SYSTEM_PROMPT_ID: &str = "qa.system";
pub const MISS_PROMPT_ID: &str = "qa.miss";
pub const SUCCESS_PROMPT_ID: &str = "qa.success";

pub const BUILTIN_API_VERSION: &str = "1.0";

/// Compliance-expert persona. `{{fallback}}` is empty unless the operating
/// mode pins a verbatim answer for documents that miss the query.
const SYSTEM_TEMPLATE: &str = "You are an expert on legal compliance.
Your task is to give well-founded answers to user queries.
Always provide a reference to the source documents you rely on.{{#if fallback}}
If the provided documents do not contain information pertaining to the query, always answer: {{fallback}}{{/if}}
";

const MISS_TEMPLATE: &str = "No documents could be retrieved matching the user's query.
Use your knowledge to explain to the user what might be the reason that the question can't be answered from the knowledge base.
Do not fabricate facts or make assumptions beyond what the context or your knowledge base provides.
Ensure that the response is structured, concise, and tailored to the specific question being asked.

Question: {{question}}
";

const SUCCESS_TEMPLATE: &str = "Using the provided context documents below, answer the following question accurately and comprehensively.
If the information is directly available in the context documents, cite it clearly.
If not, use your knowledge to fill in the gaps while ensuring that the response is consistent with the given information.
Do not fabricate facts or make assumptions beyond what the context or your knowledge base provides.
Ensure that the response is structured, concise, and tailored to the specific question being asked.

Input: {{context}}

Question: {{question}}
";

pub fn system() -> PromptTemplate {
    PromptTemplate::new(
        SYSTEM_PROMPT_ID,
        "Compliance expert system instruction",
        BUILTIN_API_VERSION,
        SYSTEM_TEMPLATE,
    )
}

pub fn miss() -> PromptTemplate {
    PromptTemplate::new(
        MISS_PROMPT_ID,
        "Explain a retrieval miss",
        BUILTIN_API_VERSION,
        MISS_TEMPLATE,
    )
}

pub fn success() -> PromptTemplate {
    PromptTemplate::new(
        SUCCESS_PROMPT_ID,
        "Answer from retrieved context",
        BUILTIN_API_VERSION,
        SUCCESS_TEMPLATE,
    )
}

/// Placeholders each built-in id must be rendered with.
pub fn placeholders(id: &str) -> &'static [&'static str] {
    match id {
        SYSTEM_PROMPT_ID => &["fallback"],
        MISS_PROMPT_ID => &["question"],
        SUCCESS_PROMPT_ID => &["context", "question"],
        _ => &[],
    }
}
