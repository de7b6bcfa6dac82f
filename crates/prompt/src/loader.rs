//! Loader for YAML prompt template overrides.

use crate::builder::{render_template, PromptSet};
use crate::templates;
use crate::types::PromptTemplate;
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::Path;
use yellow_core::{AppError, AppResult};

/// Load a prompt template by ID from a prompts directory.
///
/// Looks for `<id>.yml` in `prompts_dir`.
///
/// # Example
/// ```no_run
/// use yellow_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let template = load_prompt(Path::new(".yellow/prompts"), "qa.success")?;
/// println!("Loaded prompt: {} v{}", template.title, template.api_version);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: &Path, prompt_id: &str) -> AppResult<PromptTemplate> {
    let prompt_file = prompts_dir.join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let template: PromptTemplate = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    if template.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id '{}', expected '{}'",
            prompt_file, template.id, prompt_id
        )));
    }

    validate_prompt(&template)?;

    tracing::info!(
        "Loaded prompt: {} ({}, v{})",
        template.id,
        template.title,
        template.api_version
    );

    Ok(template)
}

/// List all prompt IDs with an override file in the directory.
pub fn list_prompts(prompts_dir: &Path) -> AppResult<Vec<String>> {
    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

impl PromptSet {
    /// Built-in templates overlaid with any overrides found in `prompts_dir`.
    ///
    /// Files for ids the handler does not use are ignored with a warning.
    pub fn load(prompts_dir: &Path) -> AppResult<Self> {
        let mut prompts = PromptSet::builtin();

        for id in list_prompts(prompts_dir)? {
            if templates::placeholders(&id).is_empty() {
                tracing::warn!("Ignoring unknown prompt override: {}", id);
                continue;
            }
            prompts = prompts.with_template(load_prompt(prompts_dir, &id)?)?;
        }

        Ok(prompts)
    }
}

/// Validate a prompt template.
fn validate_prompt(def: &PromptTemplate) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.api_version.is_empty() {
        return Err(AppError::Prompt(
            "Prompt apiVersion cannot be empty".to_string(),
        ));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Handlebars::new()
        .register_template_string(&def.id, &def.template)
        .map_err(|e| AppError::Prompt(format!("Invalid template {}: {}", def.id, e)))?;

    // Every required placeholder must reach the rendered text.
    let required = templates::placeholders(&def.id);
    if required.is_empty() {
        return Ok(());
    }

    let sentinels: HashMap<String, String> = required
        .iter()
        .map(|name| (name.to_string(), format!("<<yellow:{}>>", name)))
        .collect();
    let rendered = render_template(&def.template, &sentinels)
        .map_err(|e| AppError::Prompt(format!("Invalid template {}: {}", def.id, e)))?;

    for placeholder in required {
        if !rendered.contains(&sentinels[*placeholder]) {
            return Err(AppError::Prompt(format!(
                "Prompt {} must render the {{{{{}}}}} placeholder",
                def.id, placeholder
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{MISS_PROMPT_ID, SUCCESS_PROMPT_ID, SYSTEM_PROMPT_ID};
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, body: &str) {
        std::fs::write(dir.join(format!("{}.yml", id)), body).unwrap();
    }

    #[test]
    fn test_load_prompt() {
        let dir = TempDir::new().unwrap();
        write_prompt(
            dir.path(),
            MISS_PROMPT_ID,
            "id: qa.miss\ntitle: Short miss\napiVersion: \"1.1\"\ntemplate: \"No hits for {{question}}\"\n",
        );

        let template = load_prompt(dir.path(), MISS_PROMPT_ID).unwrap();
        assert_eq!(template.title, "Short miss");
        assert_eq!(template.api_version, "1.1");
    }

    #[test]
    fn test_load_prompt_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(load_prompt(dir.path(), MISS_PROMPT_ID).is_err());
    }

    #[test]
    fn test_load_prompt_id_mismatch() {
        let dir = TempDir::new().unwrap();
        write_prompt(
            dir.path(),
            MISS_PROMPT_ID,
            "id: qa.success\ntitle: t\napiVersion: \"1.0\"\ntemplate: \"{{question}}\"\n",
        );
        assert!(load_prompt(dir.path(), MISS_PROMPT_ID).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_placeholder() {
        let template = PromptTemplate::new(SUCCESS_PROMPT_ID, "t", "1.0", "Q: {{question}}");
        let err = validate_prompt(&template).unwrap_err();
        assert!(err.to_string().contains("{{context}}"));
    }

    #[test]
    fn test_validate_rejects_success_prompt_without_question() {
        let template = PromptTemplate::new(
            SUCCESS_PROMPT_ID,
            "t",
            "1.1",
            "Answer the question from: {{context}}",
        );
        let err = validate_prompt(&template).unwrap_err();
        assert!(err.to_string().contains("{{question}}"));
    }

    #[test]
    fn test_validate_rejects_system_prompt_without_fallback() {
        let template = PromptTemplate::new(
            SYSTEM_PROMPT_ID,
            "t",
            "1.1",
            "You are a compliance expert. No fallback answers.",
        );
        let err = validate_prompt(&template).unwrap_err();
        assert!(err.to_string().contains("{{fallback}}"));
    }

    #[test]
    fn test_validate_accepts_conditional_fallback() {
        let template = PromptTemplate::new(
            SYSTEM_PROMPT_ID,
            "t",
            "1.1",
            "You audit policies.{{#if fallback}} Otherwise reply: {{fallback}}{{/if}}",
        );
        assert!(validate_prompt(&template).is_ok());
    }

    #[test]
    fn test_load_rejects_override_dropping_question() {
        let dir = TempDir::new().unwrap();
        write_prompt(
            dir.path(),
            SUCCESS_PROMPT_ID,
            "id: qa.success\ntitle: Short\napiVersion: \"1.1\"\ntemplate: \"Answer the question from: {{context}}\"\n",
        );
        assert!(matches!(PromptSet::load(dir.path()), Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_validate_rejects_bad_version() {
        let template = PromptTemplate::new(MISS_PROMPT_ID, "t", "1", "{{question}}");
        assert!(validate_prompt(&template).is_err());
    }

    #[test]
    fn test_validate_rejects_broken_syntax() {
        let template = PromptTemplate::new(MISS_PROMPT_ID, "t", "1.0", "{{#if question}}open");
        assert!(validate_prompt(&template).is_err());
    }

    #[test]
    fn test_list_prompts() {
        let dir = TempDir::new().unwrap();
        write_prompt(dir.path(), "qa.success", "");
        write_prompt(dir.path(), "qa.miss", "");
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids = list_prompts(dir.path()).unwrap();
        assert_eq!(ids, vec!["qa.miss".to_string(), "qa.success".to_string()]);
    }

    #[test]
    fn test_list_prompts_missing_dir() {
        let ids = list_prompts(Path::new("/nonexistent/prompts")).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_prompt_set_load_overlays_builtin() {
        let dir = TempDir::new().unwrap();
        write_prompt(
            dir.path(),
            MISS_PROMPT_ID,
            "id: qa.miss\ntitle: Short miss\napiVersion: \"1.1\"\ntemplate: \"No hits for {{question}}\"\n",
        );
        write_prompt(dir.path(), "qa.unused", "id: qa.unused\n");

        let prompts = PromptSet::load(dir.path()).unwrap();
        assert_eq!(prompts.miss_prompt("vat").unwrap(), "No hits for vat");
        assert_eq!(
            prompts.get(SUCCESS_PROMPT_ID).unwrap().api_version,
            crate::templates::BUILTIN_API_VERSION
        );
    }
}
