//! Prompts command handler.
//!
//! Shows which prompt templates the query handler will render.

use clap::Args;
use yellow_core::{config::AppConfig, AppError, AppResult};
use yellow_prompt::{list_prompts, PromptSet, MISS_PROMPT_ID, SUCCESS_PROMPT_ID, SYSTEM_PROMPT_ID};

/// List or show the active prompt templates
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Print the full template with this id
    #[arg(long)]
    pub show: Option<String>,
}

impl PromptsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing prompts command");

        let prompts_dir = config.prompts_dir();
        let prompts = PromptSet::load(&prompts_dir)?;

        if let Some(ref id) = self.show {
            let template = prompts
                .get(id)
                .ok_or_else(|| AppError::Prompt(format!("Unknown prompt id: {}", id)))?;
            print!("{}", template.template);
            return Ok(());
        }

        let overrides = list_prompts(&prompts_dir)?;
        for id in [SYSTEM_PROMPT_ID, MISS_PROMPT_ID, SUCCESS_PROMPT_ID] {
            if let Some(template) = prompts.get(id) {
                let source = if overrides.iter().any(|o| o == id) {
                    "override"
                } else {
                    "built-in"
                };
                println!(
                    "{:<12} v{:<6} {:<9} {}",
                    template.id, template.api_version, source, template.title
                );
            }
        }

        Ok(())
    }
}
