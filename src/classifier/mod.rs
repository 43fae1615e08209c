//! Rule-based, multi-level, LLM and hybrid classification behind one
//! `classify` entry point.

mod hybrid;
mod multi_level;
mod rule;
mod scoring;

use serde::Serialize;

use crate::{ai::LlmClassifier, domain::ClassificationResult};

pub use hybrid::HybridClassifier;
pub use multi_level::{blend_confidence, ConfidenceBand, MultiLevelClassifier, MultiLevelExplanation};
pub use rule::{RuleClassifier, RuleExplanation};

/// A synchronous keyword scorer usable as the hybrid classifier's first pass.
pub trait RuleScorer: Send + Sync {
    fn classify(&self, title: &str, content: &str) -> ClassificationResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Accept,
    Review,
    Reject,
}

impl Recommendation {
    /// `accept` above 0.7, `review` otherwise.
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence > 0.7 {
            Self::Accept
        } else {
            Self::Review
        }
    }
}

pub enum Classifier {
    Rule(RuleClassifier),
    MultiLevel(MultiLevelClassifier),
    Llm(LlmClassifier),
    Hybrid(HybridClassifier),
}

impl Classifier {
    pub async fn classify(&self, title: &str, content: &str) -> ClassificationResult {
        match self {
            Self::Rule(rule) => rule.classify(title, content),
            Self::MultiLevel(multi) => multi.classify(title, content),
            Self::Llm(llm) => llm.classify(title, content, None).await,
            Self::Hybrid(hybrid) => hybrid.classify(title, content).await,
        }
    }

    /// Every record goes to the model, so batches should be paced.
    pub fn is_llm(&self) -> bool {
        matches!(self, Self::Llm(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rule(_) => "rule",
            Self::MultiLevel(_) => "multi_level",
            Self::Llm(_) => "ai",
            Self::Hybrid(_) => "hybrid",
        }
    }
}
