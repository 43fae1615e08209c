use std::sync::Arc;

use tracing::{debug, info};

use crate::{ai::LlmClassifier, domain::ClassificationResult, quality::preview};

use super::RuleScorer;

/// Keyword rules first; the LLM is only consulted when the rules are not
/// confident enough.
#[derive(Clone)]
pub struct HybridClassifier {
    primary: Arc<dyn RuleScorer>,
    fallback: Option<LlmClassifier>,
    threshold: f64,
}

impl HybridClassifier {
    pub fn new(primary: Arc<dyn RuleScorer>, fallback: Option<LlmClassifier>, threshold: f64) -> Self {
        if fallback.is_none() {
            info!(target: "classifier", "hybrid classifier running without LLM fallback");
        }
        Self {
            primary,
            fallback,
            threshold,
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub async fn classify(&self, title: &str, content: &str) -> ClassificationResult {
        let ruled = self.primary.classify(title, content);
        if ruled.confidence >= self.threshold {
            debug!(
                target: "classifier",
                category = %ruled.category,
                confidence = ruled.confidence,
                "rule result accepted"
            );
            return ruled;
        }

        match &self.fallback {
            Some(llm) => {
                info!(
                    target: "classifier",
                    title = %preview(title),
                    confidence = ruled.confidence,
                    threshold = self.threshold,
                    "rule confidence below threshold, asking LLM"
                );
                llm.classify(title, content, None).await
            }
            None => ruled,
        }
    }
}
