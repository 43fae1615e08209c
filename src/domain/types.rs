use std::fmt;

use serde::{Serialize, Serializer};

use crate::taxonomy::OTHER;

/// How a result was produced; rendered as the `classification_method` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationMethod {
    RuleBased,
    MultiLevelRuleBased,
    Ai { model: String },
    /// The model replied, but not with parseable JSON.
    AiFallback { model: String },
    /// Every attempt to reach the model failed.
    AiError { model: String },
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleBased => f.write_str("rule_based"),
            Self::MultiLevelRuleBased => f.write_str("multi_level_rule_based"),
            Self::Ai { model } => write!(f, "ai_{model}"),
            Self::AiFallback { model } => write!(f, "ai_{model}_fallback"),
            Self::AiError { model } => write!(f, "ai_{model}_error"),
        }
    }
}

impl Serialize for ClassificationMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub key: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LevelConfidence {
    pub category: f64,
    pub subcategory: f64,
    pub sub_subcategory: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_subcategory: Option<String>,
    /// Display names of the resolved levels, top down.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_path: Vec<String>,
    pub levels: LevelConfidence,
    /// Overall confidence in [0, 1].
    pub confidence: f64,
    pub matched_keywords: Vec<KeywordMatch>,
    /// Normalized top-level scores in enumeration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<CategoryScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub method: ClassificationMethod,
}

impl ClassificationResult {
    /// A single-level result with only the top level filled in.
    pub fn flat(category: impl Into<String>, confidence: f64, method: ClassificationMethod) -> Self {
        Self {
            category: category.into(),
            subcategory: None,
            sub_subcategory: None,
            category_path: Vec::new(),
            levels: LevelConfidence {
                category: confidence,
                ..Default::default()
            },
            confidence,
            matched_keywords: Vec::new(),
            scores: Vec::new(),
            reasoning: None,
            method,
        }
    }

    /// Lowest-confidence result: category `other`, confidence 0.
    pub fn other(method: ClassificationMethod) -> Self {
        Self::flat(OTHER, 0.0, method)
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn is_other(&self) -> bool {
        self.category == OTHER
    }
}

/// Outcome of the quality and spam filter for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityAssessment {
    pub title: String,
    pub content: String,
    pub content_length: usize,
    pub quality_score: f64,
    pub is_valid: bool,
    pub is_spam: bool,
    pub spam_keywords: Vec<String>,
}
