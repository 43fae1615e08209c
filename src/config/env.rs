use std::{fmt, str::FromStr, time::Duration};

use thiserror::Error;

use crate::taxonomy::CatalogPaths;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub classifier: ClassifierConfig,
    pub quality: QualityConfig,
    pub llm: LlmConfig,
    pub catalog: CatalogPaths,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMode {
    /// Weighted single-level keyword scoring.
    Rule,
    /// Keyword scoring at each taxonomy level.
    MultiLevel,
    /// Single-level rules, LLM below the threshold.
    Hybrid,
    /// Multi-level rules, LLM below the threshold.
    HybridMultiLevel,
    /// LLM only.
    Ai,
}

impl ClassifierMode {
    pub fn needs_llm(self) -> bool {
        matches!(self, Self::Ai)
    }

    pub fn wants_llm(self) -> bool {
        matches!(self, Self::Ai | Self::Hybrid | Self::HybridMultiLevel)
    }
}

impl FromStr for ClassifierMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rule" | "rule_based" => Ok(Self::Rule),
            "multi_level" | "multi-level" => Ok(Self::MultiLevel),
            "hybrid" => Ok(Self::Hybrid),
            "hybrid_multi_level" | "hybrid-multi-level" => Ok(Self::HybridMultiLevel),
            "ai" | "llm" => Ok(Self::Ai),
            _ => Err(ConfigError::Invalid {
                key: "CLASSIFIER_MODE",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rule => "rule",
            Self::MultiLevel => "multi_level",
            Self::Hybrid => "hybrid",
            Self::HybridMultiLevel => "hybrid_multi_level",
            Self::Ai => "ai",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub mode: ClassifierMode,
    /// Below this, the single-level classifier demotes its pick to `other`.
    pub confidence_threshold: f64,
    /// Below this, the hybrid dispatcher escalates to the LLM.
    pub hybrid_threshold: f64,
}

#[derive(Debug, Clone)]
pub struct QualityConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub min_quality_score: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_length: 200,
            max_length: 50_000,
            min_quality_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    DeepSeek,
    Zhipu,
}

impl LlmProvider {
    /// Short name used in `ai_<model>` method tags.
    pub fn key(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Zhipu => "zhipu",
        }
    }

    /// Model name sent in the chat-completion request.
    pub fn chat_model(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek-chat",
            Self::Zhipu => "glm-4",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "zhipu" => Ok(Self::Zhipu),
            other => Err(ConfigError::UnsupportedModel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Raw `AI_CLASSIFIER_MODEL` selection; validated when the LLM
    /// classifier is built.
    pub model: String,
    pub deepseek_api_key: Option<String>,
    pub deepseek_base_url: String,
    pub zhipu_api_key: Option<String>,
    pub zhipu_base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub batch_delay: Duration,
    pub prompt_max_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "deepseek".to_string(),
            deepseek_api_key: None,
            deepseek_base_url: "https://api.deepseek.com/v1".to_string(),
            zhipu_api_key: None,
            zhipu_base_url: "https://open.bigmodel.cn/api/paas/v4".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            batch_delay: Duration::from_millis(1_000),
            prompt_max_chars: 3_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub logs_dir: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("unsupported AI classifier model: {0} (expected deepseek or zhipu)")]
    UnsupportedModel(String),
}
