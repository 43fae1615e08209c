use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::taxonomy::CatalogPaths;

use super::env::{
    AppConfig, ClassifierConfig, ClassifierMode, ConfigError, LlmConfig, LoggingConfig,
    QualityConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Builds the configuration from any key/value source; blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let confidence_threshold = threshold(&get, "CONFIDENCE_THRESHOLD", 0.7)?;
        let classifier = ClassifierConfig {
            mode: get("CLASSIFIER_MODE")
                .map(|v| v.parse::<ClassifierMode>())
                .transpose()?
                .unwrap_or(ClassifierMode::MultiLevel),
            confidence_threshold,
            hybrid_threshold: threshold(&get, "HYBRID_CONFIDENCE_THRESHOLD", confidence_threshold)?,
        };

        let quality_defaults = QualityConfig::default();
        let quality = QualityConfig {
            min_length: parse_or(&get, "MIN_CONTENT_LENGTH", quality_defaults.min_length)?,
            max_length: parse_or(&get, "MAX_CONTENT_LENGTH", quality_defaults.max_length)?,
            min_quality_score: threshold(
                &get,
                "MIN_QUALITY_SCORE",
                quality_defaults.min_quality_score,
            )?,
        };
        if quality.min_length > quality.max_length {
            return Err(ConfigError::Invalid {
                key: "MIN_CONTENT_LENGTH",
                value: quality.min_length.to_string(),
            });
        }

        let llm_defaults = LlmConfig::default();
        let llm = LlmConfig {
            model: get("AI_CLASSIFIER_MODEL").unwrap_or(llm_defaults.model),
            deepseek_api_key: get("DEEPSEEK_API_KEY"),
            deepseek_base_url: get("DEEPSEEK_BASE_URL").unwrap_or(llm_defaults.deepseek_base_url),
            zhipu_api_key: get("ZHIPUAI_API_KEY"),
            zhipu_base_url: get("ZHIPUAI_BASE_URL").unwrap_or(llm_defaults.zhipu_base_url),
            timeout: Duration::from_secs(parse_or(
                &get,
                "AI_API_TIMEOUT",
                llm_defaults.timeout.as_secs(),
            )?),
            max_retries: parse_or(&get, "AI_API_MAX_RETRIES", llm_defaults.max_retries)?,
            batch_delay: Duration::from_millis(parse_or(
                &get,
                "AI_BATCH_DELAY_MS",
                llm_defaults.batch_delay.as_millis() as u64,
            )?),
            prompt_max_chars: parse_or(
                &get,
                "AI_PROMPT_MAX_CHARS",
                llm_defaults.prompt_max_chars,
            )?,
        };

        let catalog = CatalogPaths {
            taxonomy: get("TAXONOMY_PATH").map(PathBuf::from),
            keyword_rules: get("KEYWORD_RULES_PATH").map(PathBuf::from),
            exclusions: get("EXCLUSION_KEYWORDS_PATH").map(PathBuf::from),
        };

        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            logs_dir: get("LOGS_DIR"),
        };

        Ok(Self {
            classifier,
            quality,
            llm,
            catalog,
            logging,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn threshold<G>(get: &G, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}
