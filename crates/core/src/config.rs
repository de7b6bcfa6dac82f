//! Configuration management.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.yellow/config.yaml` or `YELLOW_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Nothing here is process-global: the resolved `AppConfig` is handed to
//! whoever builds the query handler.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Model identifier used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-instruct";

/// Document index endpoint used when nothing else is configured.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "http://localhost:8080";

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .yellow/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Chat provider ("openai" for OpenAI-compatible services, "ollama")
    pub provider: String,

    /// Chat model identifier
    pub model: String,

    /// API key for the chat provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,

    /// Document index service settings
    pub search: SearchConfig,

    /// Query handler overrides
    pub qa: QaSettings,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
        #[serde(rename = "organizationEnv", default)]
        organization_env: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Endpoint override for this provider, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenAI { endpoint, .. } => endpoint.as_deref(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.as_str()),
        }
    }

    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { model, .. } | ProviderConfig::Ollama { model, .. } => model,
        }
    }
}

/// Document index service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the document index API
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the bearer token
    #[serde(rename = "tokenEnv", default)]
    pub token_env: Option<String>,

    /// Resolved token (never read from or written to the config file)
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_search_endpoint() -> String {
    DEFAULT_SEARCH_ENDPOINT.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            token_env: None,
            token: None,
        }
    }
}

impl SearchConfig {
    /// Resolve the bearer token: explicit value first, then `tokenEnv`.
    pub fn resolve_token(&self) -> Option<String> {
        self.token.clone().or_else(|| {
            self.token_env
                .as_ref()
                .and_then(|var| std::env::var(var).ok())
        })
    }
}

/// Optional overrides for the query handler profile.
///
/// Every field is optional; unset fields keep the defaults of the selected
/// operating mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaSettings {
    /// Operating mode name ("evidence" or "answer-only")
    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub collection: Option<String>,

    #[serde(default)]
    pub index: Option<String>,

    #[serde(rename = "maxResults", default)]
    pub max_results: Option<usize>,

    #[serde(rename = "minScore", default)]
    pub min_score: Option<f64>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(rename = "maxTokens", default)]
    pub max_tokens: Option<u32>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    search: Option<SearchConfig>,
    qa: Option<QaSettings>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "openai".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            search: SearchConfig::default(),
            qa: QaSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, config file and defaults.
    ///
    /// Environment variables:
    /// - `YELLOW_WORKSPACE`: Override workspace path
    /// - `YELLOW_CONFIG`: Path to config file
    /// - `YELLOW_PROVIDER`: Chat provider
    /// - `YELLOW_MODEL`: Chat model identifier
    /// - `YELLOW_API_KEY`: Chat provider API key
    /// - `YELLOW_MODE`: Operating mode
    /// - `YELLOW_SEARCH_ENDPOINT`: Document index base URL
    /// - `YELLOW_SEARCH_TOKEN`: Document index bearer token
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use yellow_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], with an explicit workspace and config file
    /// taking precedence over `YELLOW_WORKSPACE` and `YELLOW_CONFIG`.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("YELLOW_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("YELLOW_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        match config.config_file.clone() {
            Some(path) if !path.exists() => {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            Some(path) => config = config.merge_yaml(&path)?,
            None => {
                let default_path = config.yellow_dir().join("config.yaml");
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("YELLOW_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("YELLOW_MODEL") {
            config.model = model;
        }

        if let Ok(mode) = std::env::var("YELLOW_MODE") {
            config.qa.mode = Some(mode);
        }

        if let Ok(endpoint) = std::env::var("YELLOW_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        if let Ok(token) = std::env::var("YELLOW_SEARCH_TOKEN") {
            config.search.token = Some(token);
        }

        config.api_key = std::env::var("YELLOW_API_KEY").ok();
        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(qa) = config_file.qa {
            if let Some(ref model) = qa.model {
                result.model = model.clone();
            }
            result.qa = qa;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .yellow directory.
    pub fn yellow_dir(&self) -> PathBuf {
        self.workspace.join(".yellow")
    }

    /// Directory holding prompt template overrides.
    pub fn prompts_dir(&self) -> PathBuf {
        self.yellow_dir().join("prompts")
    }

    /// Get the configuration for a provider, if the config file declares one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Endpoint for the active provider, if configured.
    pub fn provider_endpoint(&self) -> Option<&str> {
        self.get_provider_config(&self.provider)
            .and_then(ProviderConfig::endpoint)
    }

    /// Resolve the API key for a provider.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAI { api_key_env, .. }) => std::env::var(api_key_env).ok(),
            _ => None,
        }
    }

    /// Resolve the organization id for a provider from its `organizationEnv`.
    pub fn resolve_organization(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAI {
                organization_env: Some(var),
                ..
            }) => std::env::var(var).ok(),
            _ => None,
        }
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "openai" && self.resolve_api_key(&provider).is_none() {
            let hint = match self.get_provider_config(&provider) {
                Some(ProviderConfig::OpenAI { api_key_env, .. }) => api_key_env.clone(),
                _ => "YELLOW_API_KEY".to_string(),
            };
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                hint
            )));
        }

        if self.search.endpoint.trim().is_empty() {
            return Err(AppError::Config(
                "Search endpoint cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.search.endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.qa, QaSettings::default());
        assert!(!config.verbose);
    }

    #[test]
    fn test_yellow_dir() {
        let config = AppConfig::default();
        assert!(config.yellow_dir().ends_with(".yellow"));
        assert!(config.prompts_dir().ends_with(".yellow/prompts"));
    }

    #[test]
    fn test_with_overrides() {
        let overridden = AppConfig::default().with_overrides(
            None,
            None,
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let file = write_yaml(
            r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://gpu-box:11434
      model: llama3.3
search:
  endpoint: https://docs.example.com
  tokenEnv: DOCS_TOKEN
qa:
  mode: answer-only
  collection: handbook
  minScore: 0.65
  model: llama-3.1-8b-instruct
logging:
  level: warn
  color: false
"#,
        );

        let merged = AppConfig::default().merge_yaml(file.path()).unwrap();
        assert_eq!(merged.provider, "ollama");
        assert_eq!(merged.model, "llama-3.1-8b-instruct");
        assert_eq!(merged.provider_endpoint(), Some("http://gpu-box:11434"));
        assert_eq!(merged.search.endpoint, "https://docs.example.com");
        assert_eq!(merged.search.token_env.as_deref(), Some("DOCS_TOKEN"));
        assert_eq!(merged.qa.mode.as_deref(), Some("answer-only"));
        assert_eq!(merged.qa.collection.as_deref(), Some("handbook"));
        assert_eq!(merged.qa.min_score, Some(0.65));
        assert_eq!(merged.qa.namespace, None);
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert!(merged.no_color);
    }

    #[test]
    fn test_merge_yaml_invalid() {
        let file = write_yaml("qa: 42\n");
        let result = AppConfig::default().merge_yaml(file.path());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_openai_with_explicit_key() {
        let mut config = AppConfig::default();
        config.api_key = Some("secret".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.resolve_api_key("openai").as_deref(), Some("secret"));
    }

    #[test]
    fn test_search_token_prefers_explicit_value() {
        let search = SearchConfig {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            token_env: Some("YELLOW_TEST_UNSET_TOKEN_VAR".to_string()),
            token: Some("abc".to_string()),
        };
        assert_eq!(search.resolve_token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_load_with_missing_config_file() {
        let workspace = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_with(
            Some(workspace.path().to_path_buf()),
            Some(workspace.path().join("absent.yaml")),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_with_explicit_config_file() {
        let workspace = tempfile::TempDir::new().unwrap();
        let file = write_yaml("qa:
  index: contracts-v2
");

        let config = AppConfig::load_with(
            Some(workspace.path().to_path_buf()),
            Some(file.path().to_path_buf()),
        )
        .unwrap();

        assert_eq!(config.workspace, workspace.path());
        assert_eq!(config.qa.index.as_deref(), Some("contracts-v2"));
    }

    #[test]
    fn test_resolve_organization_from_env() {
        std::env::set_var("YELLOW_TEST_ORG_ID", "org-compliance");
        let file = write_yaml(
            r#"
llm:
  activeProvider: openai
  providers:
    openai:
      apiKeyEnv: YELLOW_TEST_OPENAI_KEY
      model: llama-3.3-70b-instruct
      endpoint: https://inference.example.com/v1
      organizationEnv: YELLOW_TEST_ORG_ID
"#,
        );

        let merged = AppConfig::default().merge_yaml(file.path()).unwrap();
        assert_eq!(
            merged.resolve_organization("openai").as_deref(),
            Some("org-compliance")
        );
        assert_eq!(merged.resolve_organization("ollama"), None);
    }
}
