//! Configuration management for the Virtual TA.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.vta/config.yaml)
//!
//! The configuration is workspace-centric: optional overrides such as prompt
//! templates and a replacement corpus live under `.vta/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Default generation provider.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default generation model. Flash models carry the higher free-tier limits.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Environment variable consulted for the Gemini key when no provider config names one.
pub const DEFAULT_GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["gemini", "ollama", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .vta/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation provider (e.g., "gemini", "ollama")
    pub provider: String,

    /// Model identifier, or "auto" to pick from the provider's model list
    pub model: String,

    /// API key for the generation provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,

    /// Throttle, quota and corpus settings for the answer pipeline
    pub assistant: AssistantConfig,
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
    Gemini {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

/// How the daily call budget is replenished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum QuotaReset {
    /// The budget is spent once per process lifetime and never refills.
    #[default]
    Lifetime,

    /// The counter resets when the UTC calendar date changes.
    CalendarDay,
}

/// Answer pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    /// Minimum seconds between two generation calls, process-wide
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: f64,

    /// Generation calls allowed before the pipeline answers from fallback only
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Attempts per generation call (first try included)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between two attempts of the same call
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Budget replenishment policy
    #[serde(default)]
    pub quota_reset: QuotaReset,

    /// Optional YAML corpus replacing the built-in seed content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_path: Option<PathBuf>,
}

fn default_min_delay_secs() -> f64 {
    5.0
}

fn default_daily_limit() -> u32 {
    50
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: default_min_delay_secs(),
            daily_limit: default_daily_limit(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            quota_reset: QuotaReset::default(),
            corpus_path: None,
        }
    }
}

impl AssistantConfig {
    /// Minimum inter-call delay as a `Duration`.
    pub fn min_delay(&self) -> Duration {
        Duration::from_secs_f64(self.min_delay_secs.max(0.0))
    }

    /// Backoff between attempts as a `Duration`.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    assistant: Option<AssistantConfig>,
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
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            assistant: AssistantConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `VTA_WORKSPACE`: Override workspace path
    /// - `VTA_CONFIG`: Path to config file
    /// - `VTA_PROVIDER`: Generation provider
    /// - `VTA_MODEL`: Model identifier
    /// - `VTA_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use vta_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("VTA_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("VTA_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.vta_dir().join("config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("VTA_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("VTA_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("VTA_API_KEY").ok().filter(|k| !k.is_empty());
        config.log_level = config.log_level.or_else(|| std::env::var("RUST_LOG").ok());

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
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
                result.model = match provider_config {
                    ProviderConfig::Gemini { model, .. } => model.clone(),
                    ProviderConfig::Ollama { model, .. } => model.clone(),
                };
            }

            result.llm = Some(llm);
        }

        if let Some(assistant) = config_file.assistant {
            result.assistant = assistant;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
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
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .vta directory.
    pub fn vta_dir(&self) -> PathBuf {
        self.workspace.join(".vta")
    }

    /// Resolve the configured corpus file against the workspace.
    pub fn corpus_path(&self) -> Option<PathBuf> {
        self.assistant.corpus_path.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                self.workspace.join(path)
            }
        })
    }

    /// Get a provider configuration by name.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Resolve the endpoint override for a provider, if one is configured.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider)? {
            ProviderConfig::Gemini { endpoint, .. } => endpoint,
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint),
        }
    }

    /// Resolve the API key for a provider.
    ///
    /// Order: `VTA_API_KEY`, the provider's `apiKeyEnv`, then `GEMINI_API_KEY`
    /// for the Gemini provider.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        let env_var = match self.get_provider_config(provider) {
            Some(ProviderConfig::Gemini { api_key_env, .. }) => Some(api_key_env),
            Some(ProviderConfig::Ollama { .. }) => None,
            None if provider.eq_ignore_ascii_case("gemini") => {
                Some(DEFAULT_GEMINI_KEY_ENV.to_string())
            }
            None => None,
        };

        env_var
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
    }

    /// Validate configuration for the active provider and the assistant settings.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.assistant.max_attempts == 0 {
            return Err(AppError::Config(
                "assistant.maxAttempts must be at least 1".to_string(),
            ));
        }

        if self.assistant.daily_limit == 0 {
            return Err(AppError::Config(
                "assistant.dailyLimit must be at least 1".to_string(),
            ));
        }

        if !self.assistant.min_delay_secs.is_finite() || self.assistant.min_delay_secs < 0.0 {
            return Err(AppError::Config(format!(
                "assistant.minDelaySecs must be a non-negative number, got {}",
                self.assistant.min_delay_secs
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.assistant.daily_limit, 50);
        assert_eq!(config.assistant.max_attempts, 2);
        assert_eq!(config.assistant.min_delay(), Duration::from_secs(5));
        assert_eq!(config.assistant.quota_reset, QuotaReset::Lifetime);
        assert!(!config.verbose);
    }

    #[test]
    fn test_vta_dir() {
        let config = AppConfig::default();
        assert!(config.vta_dir().ends_with(".vta"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
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
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://localhost:11434
      model: llama3.2
assistant:
  minDelaySecs: 0.5
  dailyLimit: 3
  quotaReset: calendarDay
  corpusPath: corpus.yaml
logging:
  level: debug
  color: false
"#,
        )
        .unwrap();

        let mut base = AppConfig::default();
        base.workspace = temp.path().to_path_buf();
        let config = base.merge_yaml(&path).unwrap();

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.assistant.daily_limit, 3);
        assert_eq!(config.assistant.max_attempts, 2);
        assert_eq!(config.assistant.min_delay(), Duration::from_millis(500));
        assert_eq!(config.assistant.quota_reset, QuotaReset::CalendarDay);
        assert_eq!(config.corpus_path(), Some(temp.path().join("corpus.yaml")));
        assert_eq!(
            config.resolve_endpoint("ollama"),
            Some("http://localhost:11434".to_string())
        );
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(config.no_color);
    }

    #[test]
    fn test_merge_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "assistant: [unclosed").unwrap();

        let result = AppConfig::default().merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let mut config = AppConfig::default();
        config.api_key = Some("explicit".to_string());
        assert_eq!(config.resolve_api_key("gemini"), Some("explicit".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_assistant_limits() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.assistant.max_attempts = 0;
        assert!(config.validate().is_err());

        config.assistant.max_attempts = 2;
        config.assistant.daily_limit = 0;
        assert!(config.validate().is_err());

        config.assistant.daily_limit = 10;
        config.assistant.min_delay_secs = -1.0;
        assert!(config.validate().is_err());
    }
}
