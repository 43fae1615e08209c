use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tracing::{debug, info};

use crate::{
    config::{ConfigError, LlmConfig, LlmProvider},
    domain::{ClassificationMethod, ClassificationResult, ContentRecord, EnrichedRecord},
    quality::preview,
};

use super::{
    client::{ChatBackend, ChatCompletionClient, LlmError},
    inference::{build_prompt, parse_reply},
    retry::{retry_or_degrade, RetryPolicy},
};

const DEFAULT_PROMPT_MAX_CHARS: usize = 3_000;

/// Classifies content by asking a chat model. Transport failures are retried
/// and then degraded into an `other` result; `classify` never errors.
#[derive(Clone)]
pub struct LlmClassifier {
    backend: Arc<dyn ChatBackend>,
    model: String,
    retry: RetryPolicy,
    prompt_max_chars: usize,
}

impl LlmClassifier {
    /// `model` is the short tag used in the `ai_<model>` method names.
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            retry: RetryPolicy::default(),
            prompt_max_chars: DEFAULT_PROMPT_MAX_CHARS,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_prompt_max_chars(mut self, max_chars: usize) -> Self {
        self.prompt_max_chars = max_chars;
        self
    }

    /// Picks the provider named by `AI_CLASSIFIER_MODEL` and wires an HTTP
    /// client for it. Fails when the model is unknown, its key is absent or
    /// its base URL does not parse.
    pub fn from_config(http: Client, config: &LlmConfig) -> Result<Self, ConfigError> {
        let provider: LlmProvider = config.model.parse()?;
        let (key_var, api_key, base_url) = match provider {
            LlmProvider::DeepSeek => (
                "DEEPSEEK_API_KEY",
                config.deepseek_api_key.as_deref(),
                config.deepseek_base_url.as_str(),
            ),
            LlmProvider::Zhipu => (
                "ZHIPUAI_API_KEY",
                config.zhipu_api_key.as_deref(),
                config.zhipu_base_url.as_str(),
            ),
        };
        let api_key = api_key.ok_or(ConfigError::Missing(key_var))?;

        let client = ChatCompletionClient::new(http, base_url, api_key, provider.chat_model())
            .map_err(|_| ConfigError::Invalid {
                key: match provider {
                    LlmProvider::DeepSeek => "DEEPSEEK_BASE_URL",
                    LlmProvider::Zhipu => "ZHIPUAI_BASE_URL",
                },
                value: base_url.to_string(),
            })?;
        info!(
            target: "ai",
            model = provider.key(),
            endpoint = %client.endpoint(),
            "LLM classifier configured"
        );

        Ok(Self::new(Arc::new(client), provider.key())
            .with_retry(RetryPolicy::exponential(config.max_retries))
            .with_prompt_max_chars(config.prompt_max_chars))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `max_retries` overrides the configured attempt count; `None` or `0`
    /// keeps it.
    pub async fn classify(
        &self,
        title: &str,
        content: &str,
        max_retries: Option<u32>,
    ) -> ClassificationResult {
        let policy = match max_retries {
            Some(n) if n > 0 => self.retry.with_max_attempts(n),
            _ => self.retry,
        };
        let prompt = build_prompt(title, content, self.prompt_max_chars);
        let backend = &self.backend;
        let prompt = prompt.as_str();
        let model = self.model.as_str();

        let result = retry_or_degrade(
            &policy,
            |_| async move {
                let reply = backend.complete(prompt).await?;
                Ok::<_, LlmError>(parse_reply(&reply, model))
            },
            |err| {
                ClassificationResult::other(ClassificationMethod::AiError {
                    model: model.to_string(),
                })
                .with_reasoning(format!("API error: {err}"))
            },
        )
        .await;
        debug!(
            target: "ai",
            title = %preview(title),
            category = %result.category,
            confidence = result.confidence,
            method = %result.method,
            "LLM classification"
        );
        result
    }

    /// Classifies each record in order, sleeping `delay` between calls.
    pub async fn classify_batch(
        &self,
        records: &[ContentRecord],
        delay: Duration,
    ) -> Vec<EnrichedRecord> {
        let total = records.len();
        let mut out = Vec::with_capacity(total);
        for (idx, record) in records.iter().enumerate() {
            if idx > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            info!(target: "ai", current = idx + 1, total, "classifying record");
            let result = self.classify(&record.title, &record.content, None).await;
            out.push(EnrichedRecord::new(record, None, Some(&result)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    };

    use futures::future::BoxFuture;
    use tokio::time::Instant;

    use super::*;

    /// Fails every call and counts them.
    #[derive(Default)]
    struct Unreachable {
        calls: AtomicU32,
    }

    impl ChatBackend for Unreachable {
        fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, LlmError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(LlmError::Backend("connection refused".into())) })
        }
    }

    /// Replies with a fixed string and records each prompt.
    struct Scripted {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatBackend for Scripted {
        fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, LlmError>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let reply = self.reply.clone();
            Box::pin(async move { Ok(reply) })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_backend_degrades_to_other_after_retries() {
        let backend = Arc::new(Unreachable::default());
        let classifier = LlmClassifier::new(backend.clone(), "deepseek");

        let result = classifier.classify("标题", "内容", Some(2)).await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.category, "other");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method.to_string(), "ai_deepseek_error");
        assert!(result
            .reasoning
            .as_deref()
            .unwrap()
            .starts_with("API error: connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_max_retries_uses_configured_policy() {
        let backend = Arc::new(Unreachable::default());
        let classifier = LlmClassifier::new(backend.clone(), "zhipu")
            .with_retry(RetryPolicy::exponential(4));

        classifier.classify("", "", Some(0)).await;
        assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn json_reply_is_mapped_to_internal_key() {
        let backend = Arc::new(Scripted::new(
            r#"{"category":"财务会计税务","confidence":0.88,"reasoning":"增值税申报"}"#,
        ));
        let classifier = LlmClassifier::new(backend.clone(), "deepseek").with_prompt_max_chars(5);

        let result = classifier
            .classify("增值税", "一般纳税人的增值税申报流程", None)
            .await;

        assert_eq!(result.category, "finance");
        assert_eq!(result.confidence, 0.88);
        assert_eq!(result.method.to_string(), "ai_deepseek");
        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("一般纳税人..."));
    }

    #[tokio::test]
    async fn prose_reply_uses_fallback_tag() {
        let backend = Arc::new(Scripted::new("我认为属于心理咨询类"));
        let classifier = LlmClassifier::new(backend, "deepseek");

        let result = classifier.classify("焦虑", "如何缓解焦虑", None).await;
        assert_eq!(result.category, "psychology");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.method.to_string(), "ai_deepseek_fallback");
    }

    #[tokio::test(start_paused = true)]
    async fn batch_waits_between_records_only() {
        let backend = Arc::new(Scripted::new(r#"{"category":"企业管理","confidence":0.9}"#));
        let classifier = LlmClassifier::new(backend.clone(), "deepseek");
        let records = vec![
            ContentRecord::new("一", "团队建设"),
            ContentRecord::new("二", "绩效考核"),
            ContentRecord::new("三", "战略规划"),
        ];

        let start = Instant::now();
        let enriched = classifier
            .classify_batch(&records, Duration::from_secs(1))
            .await;

        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(enriched.len(), 3);
        assert!(enriched.iter().all(EnrichedRecord::is_classified));
        assert_eq!(backend.prompts.lock().unwrap().len(), 3);
    }

    #[test]
    fn from_config_requires_provider_key() {
        let config = LlmConfig::default();
        let err = LlmClassifier::from_config(Client::new(), &config).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("DEEPSEEK_API_KEY")));

        let config = LlmConfig {
            model: "zhipu".into(),
            ..LlmConfig::default()
        };
        let err = LlmClassifier::from_config(Client::new(), &config).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("ZHIPUAI_API_KEY")));
    }

    #[test]
    fn from_config_rejects_unknown_model() {
        let config = LlmConfig {
            model: "gpt".into(),
            ..LlmConfig::default()
        };
        let err = LlmClassifier::from_config(Client::new(), &config).err().unwrap();
        assert!(matches!(err, ConfigError::UnsupportedModel(_)));
    }

    #[test]
    fn from_config_builds_tagged_classifier() {
        let config = LlmConfig {
            zhipu_api_key: Some("secret".into()),
            model: "Zhipu".into(),
            ..LlmConfig::default()
        };
        let classifier = LlmClassifier::from_config(Client::new(), &config).unwrap();
        assert_eq!(classifier.model(), "zhipu");
    }
}
