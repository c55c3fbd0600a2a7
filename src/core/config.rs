use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::constants::{
    DEFAULT_MAX_TOKENS, DEFAULT_PROMPT_STORE_KEY, DEFAULT_TEMPERATURE,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: Option<DatabaseConfig>,
    pub generation: GenerationConfig,
    pub prompts: PromptStoreConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Hosted chat-completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Perplexity,
}

impl LlmProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "https://api.openai.com/v1",
            LlmProvider::Perplexity => "https://api.perplexity.ai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Perplexity => "sonar",
        }
    }

    /// Provider-specific environment variable holding the API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::Perplexity => "PERPLEXITY_API_KEY",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "perplexity" => Ok(LlmProvider::Perplexity),
            other => Err(format!(
                "Invalid LLM_PROVIDER '{}': expected 'openai' or 'perplexity'",
                other
            )),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => write!(f, "openai"),
            LlmProvider::Perplexity => write!(f, "perplexity"),
        }
    }
}

/// Settings for the generation backend adapter.
///
/// Passed explicitly into the adapter at construction time.
#[derive(Clone)]
pub struct GenerationConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    pub base_url: String,
    pub default_model: String,
    pub timeout: Duration,
    pub default_max_tokens: u32,
    pub default_temperature: f32,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("default_temperature", &self.default_temperature)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PromptStoreConfig {
    /// Key under which template overrides are persisted
    pub namespace_key: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            generation: GenerationConfig::from_env()?,
            prompts: PromptStoreConfig::from_env(),
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    /// Returns `None` when `DATABASE_URL` is unset; overrides then live in memory only.
    pub fn from_env() -> Result<Option<Self>, String> {
        let Some(url) = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        Ok(Some(Self {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_var("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_var(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_var("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        }))
    }
}

impl GenerationConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let provider = match env::var("LLM_PROVIDER") {
            Ok(value) if !value.trim().is_empty() => value.parse::<LlmProvider>()?,
            _ => LlmProvider::default(),
        };

        let api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var(provider.api_key_var()))
            .map_err(|_| {
                format!(
                    "LLM_API_KEY or {} environment variable is required",
                    provider.api_key_var()
                )
            })?;

        let base_url = env::var("LLM_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| provider.default_base_url().to_string());

        let default_model = env::var("LLM_MODEL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let timeout_secs = parse_var("LLM_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;
        let default_max_tokens = parse_var("GENERATION_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let default_temperature = parse_var("GENERATION_TEMPERATURE", DEFAULT_TEMPERATURE)?;

        Ok(Self {
            provider,
            api_key,
            base_url,
            default_model,
            timeout: Duration::from_secs(timeout_secs),
            default_max_tokens,
            default_temperature,
        })
    }
}

impl PromptStoreConfig {
    pub fn from_env() -> Self {
        let namespace_key = env::var("PROMPT_STORE_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PROMPT_STORE_KEY.to_string());

        Self { namespace_key }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        Self {
            title: env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Frayma Core API".to_string()),
            version: env::var("SWAGGER_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            description: env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
                "Prompt templates and content generation for Product-Led Storytelling".to_string()
            }),
        }
    }
}

/// Read an env var, falling back to `default` when unset
fn parse_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated origin list
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<LlmProvider>(), Ok(LlmProvider::OpenAi));
        assert_eq!(
            " Perplexity ".parse::<LlmProvider>(),
            Ok(LlmProvider::Perplexity)
        );
        assert!("anthropic".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_provider_defaults() {
        assert_eq!(
            LlmProvider::OpenAi.default_base_url(),
            "https://api.openai.com/v1"
        );
        assert_eq!(
            LlmProvider::Perplexity.default_base_url(),
            "https://api.perplexity.ai"
        );
        assert_eq!(LlmProvider::Perplexity.api_key_var(), "PERPLEXITY_API_KEY");
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://app.frayma.ai, http://localhost:5173,,"),
            vec![
                "https://app.frayma.ai".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
        assert_eq!(parse_origins("*"), vec!["*".to_string()]);
    }

    #[test]
    fn test_generation_config_debug_redacts_key() {
        let config = GenerationConfig {
            provider: LlmProvider::OpenAi,
            api_key: "sk-secret".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            default_temperature: DEFAULT_TEMPERATURE,
        };

        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }
}
