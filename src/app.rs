use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;

use crate::{
    ai::LlmClassifier,
    classifier::{Classifier, HybridClassifier, MultiLevelClassifier, RuleClassifier, RuleScorer},
    config::{AppConfig, ClassifierMode, ConfigError},
    quality::QualityFilter,
    taxonomy::Catalog,
    tasks::BatchProcessor,
};

/// Everything the binary needs, built once from configuration.
pub struct TriageApp {
    config: Arc<AppConfig>,
    catalog: Catalog,
    processor: BatchProcessor,
}

impl TriageApp {
    pub fn initialize(config: AppConfig) -> Result<Self> {
        let config = Arc::new(config);
        let catalog =
            Catalog::load(&config.catalog).context("failed to load classification catalog")?;

        let http_client = Client::builder()
            .user_agent(format!("content-triage/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.llm.timeout)
            .build()?;

        let classifier = build_classifier(&config, &catalog, http_client)?;
        tracing::info!(
            target: "app",
            mode = %config.classifier.mode,
            classifier = classifier.name(),
            "classifier ready"
        );

        let filter = QualityFilter::new(config.quality.clone(), catalog.exclusions.clone());
        let processor = BatchProcessor::new(filter, Arc::new(classifier), config.llm.batch_delay);

        Ok(Self {
            config,
            catalog,
            processor,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn processor(&self) -> &BatchProcessor {
        &self.processor
    }

    pub fn rule_classifier(&self) -> RuleClassifier {
        RuleClassifier::new(
            self.catalog.keyword_rules.clone(),
            self.catalog.exclusions.clone(),
            self.config.classifier.confidence_threshold,
        )
    }

    pub fn multi_level_classifier(&self) -> MultiLevelClassifier {
        MultiLevelClassifier::new(self.catalog.taxonomy.clone())
    }
}

/// Maps the configured mode onto a classifier. A missing API key is fatal
/// for `ai` and only disables the fallback for the hybrid modes; an unknown
/// model name is always fatal.
pub fn build_classifier(config: &AppConfig, catalog: &Catalog, http: Client) -> Result<Classifier> {
    let mode = config.classifier.mode;
    let rule = || {
        RuleClassifier::new(
            catalog.keyword_rules.clone(),
            catalog.exclusions.clone(),
            config.classifier.confidence_threshold,
        )
    };
    let multi_level = || MultiLevelClassifier::new(catalog.taxonomy.clone());

    let llm = if mode.wants_llm() {
        match LlmClassifier::from_config(http, &config.llm) {
            Ok(llm) => Some(llm),
            Err(ConfigError::Missing(key)) if !mode.needs_llm() => {
                tracing::warn!(
                    target: "app",
                    key,
                    "LLM credentials missing; hybrid mode will use rule results only"
                );
                None
            }
            Err(err) => return Err(err.into()),
        }
    } else {
        None
    };

    let classifier = match mode {
        ClassifierMode::Rule => Classifier::Rule(rule()),
        ClassifierMode::MultiLevel => Classifier::MultiLevel(multi_level()),
        ClassifierMode::Ai => {
            Classifier::Llm(llm.context("LLM classifier required for ai mode")?)
        }
        ClassifierMode::Hybrid | ClassifierMode::HybridMultiLevel => {
            let primary: Arc<dyn RuleScorer> = if mode == ClassifierMode::Hybrid {
                Arc::new(rule())
            } else {
                Arc::new(multi_level())
            };
            Classifier::Hybrid(HybridClassifier::new(
                primary,
                llm,
                config.classifier.hybrid_threshold,
            ))
        }
    };
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    fn build(pairs: &[(&str, &str)]) -> Result<Classifier> {
        build_classifier(&config(pairs), &Catalog::builtin(), Client::new())
    }

    #[test]
    fn default_mode_is_multi_level() {
        assert_eq!(build(&[]).unwrap().name(), "multi_level");
    }

    #[test]
    fn ai_mode_without_key_is_fatal() {
        let err = build(&[("CLASSIFIER_MODE", "ai")]).err().unwrap();
        assert!(err.to_string().contains("DEEPSEEK_API_KEY"));
    }

    #[test]
    fn hybrid_without_key_runs_rules_only() {
        let classifier = build(&[("CLASSIFIER_MODE", "hybrid")]).unwrap();
        match classifier {
            Classifier::Hybrid(hybrid) => assert!(!hybrid.has_fallback()),
            _ => panic!("expected hybrid classifier"),
        }
    }

    #[test]
    fn hybrid_with_key_gets_fallback() {
        let classifier = build(&[
            ("CLASSIFIER_MODE", "hybrid_multi_level"),
            ("DEEPSEEK_API_KEY", "sk-test"),
        ])
        .unwrap();
        match classifier {
            Classifier::Hybrid(hybrid) => assert!(hybrid.has_fallback()),
            _ => panic!("expected hybrid classifier"),
        }
    }

    #[test]
    fn unknown_model_is_fatal_even_for_hybrid() {
        let err = build(&[("CLASSIFIER_MODE", "hybrid"), ("AI_CLASSIFIER_MODEL", "gpt")])
            .err()
            .unwrap();
        assert!(err.to_string().contains("gpt"));
    }

    #[test]
    fn initialize_wires_the_processor() {
        let app = TriageApp::initialize(config(&[("CLASSIFIER_MODE", "rule")])).unwrap();
        assert_eq!(app.processor().classifier().name(), "rule");
        assert_eq!(app.catalog().taxonomy.categories().len(), 3);
    }
}
