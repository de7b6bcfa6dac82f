//! Prompt system for the Yellow query handler.
//!
//! Prompts are versioned Handlebars templates with explicit placeholders:
//! - `qa.system`: the compliance-expert system instruction (`{{fallback}}`)
//! - `qa.miss`: sent when retrieval found nothing (`{{question}}`)
//! - `qa.success`: sent with retrieved context (`{{context}}`, `{{question}}`)
//!
//! Built-in templates can be replaced per workspace by YAML files in
//! `.yellow/prompts/<id>.yml`.

pub mod builder;
pub mod loader;
pub mod templates;
pub mod types;

// Re-export main types
pub use builder::{render_template, PromptSet};
pub use loader::{list_prompts, load_prompt};
pub use templates::{MISS_PROMPT_ID, SUCCESS_PROMPT_ID, SYSTEM_PROMPT_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptTemplate};
