//! Prompt rendering.
//!
//! Every prompt is a pure function of its placeholders: the same question and
//! context always render the same text.

use crate::templates::{self, MISS_PROMPT_ID, SUCCESS_PROMPT_ID, SYSTEM_PROMPT_ID};
use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptTemplate};
use handlebars::Handlebars;
use std::collections::HashMap;
use yellow_core::{AppError, AppResult};

/// The three templates the query handler renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSet {
    system: PromptTemplate,
    miss: PromptTemplate,
    success: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptSet {
    /// Built-in templates shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            system: templates::system(),
            miss: templates::miss(),
            success: templates::success(),
        }
    }

    /// Replace the template whose id matches `template.id`.
    pub fn with_template(mut self, template: PromptTemplate) -> AppResult<Self> {
        let slot = match template.id.as_str() {
            SYSTEM_PROMPT_ID => &mut self.system,
            MISS_PROMPT_ID => &mut self.miss,
            SUCCESS_PROMPT_ID => &mut self.success,
            other => {
                return Err(AppError::Prompt(format!(
                    "Unknown prompt id: {}. Expected one of: {}, {}, {}",
                    other, SYSTEM_PROMPT_ID, MISS_PROMPT_ID, SUCCESS_PROMPT_ID
                )))
            }
        };

        tracing::debug!(
            "Replacing prompt {} (v{} -> v{})",
            template.id,
            slot.api_version,
            template.api_version
        );
        *slot = template;

        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        match id {
            SYSTEM_PROMPT_ID => Some(&self.system),
            MISS_PROMPT_ID => Some(&self.miss),
            SUCCESS_PROMPT_ID => Some(&self.success),
            _ => None,
        }
    }

    /// Render the system instruction, optionally pinning a fallback answer.
    pub fn system_instruction(&self, fallback: Option<&str>) -> AppResult<String> {
        render(&self.system, &vars(&[("fallback", fallback.unwrap_or_default())]))
    }

    /// Render the prompt used when retrieval returned no passages.
    pub fn miss_prompt(&self, question: &str) -> AppResult<String> {
        render(&self.miss, &vars(&[("question", question)]))
    }

    /// Render the prompt that grounds the answer in retrieved context.
    pub fn success_prompt(&self, context: &str, question: &str) -> AppResult<String> {
        render(
            &self.success,
            &vars(&[("context", context), ("question", question)]),
        )
    }

    /// System instruction plus miss prompt.
    pub fn build_miss(&self, question: &str, fallback: Option<&str>) -> AppResult<BuiltPrompt> {
        let variables = vars(&[("question", question)]);
        self.build(&self.miss, variables, fallback)
    }

    /// System instruction plus success prompt.
    pub fn build_success(
        &self,
        context: &str,
        question: &str,
        fallback: Option<&str>,
    ) -> AppResult<BuiltPrompt> {
        let variables = vars(&[("context", context), ("question", question)]);
        self.build(&self.success, variables, fallback)
    }

    fn build(
        &self,
        template: &PromptTemplate,
        variables: HashMap<String, String>,
        fallback: Option<&str>,
    ) -> AppResult<BuiltPrompt> {
        tracing::debug!("Building prompt: {} (v{})", template.id, template.api_version);

        let system = self.system_instruction(fallback)?;
        let user = render(template, &variables)?;

        Ok(BuiltPrompt {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id: template.id.clone(),
                api_version: template.api_version.clone(),
                resolved_variables: variables,
            },
        })
    }
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn render(template: &PromptTemplate, variables: &HashMap<String, String>) -> AppResult<String> {
    render_template(&template.template, variables)
        .map_err(|e| AppError::Prompt(format!("{} (template {})", e, template.id)))
}

/// Render a Handlebars template with variables.
///
/// Strict mode is on, so a placeholder without a value is an error rather
/// than an empty string. HTML escaping is off; questions and passages are
/// inserted verbatim.
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
