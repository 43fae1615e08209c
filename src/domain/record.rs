use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::types::{ClassificationResult, QualityAssessment};

/// Fields written by the pipeline; stale values of the same name in the
/// incoming record are dropped so the output never carries duplicates.
const OVERLAY_KEYS: &[&str] = &[
    "quality_score",
    "content_length",
    "is_valid",
    "is_spam",
    "spam_keywords",
    "category",
    "subcategory",
    "sub_subcategory",
    "category_path",
    "confidence",
    "classification_method",
];

/// A scraped item as handed over by a collaborator. Unknown fields are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            extra: Map::new(),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityOverlay {
    pub quality_score: f64,
    pub content_length: usize,
    pub is_valid: bool,
    pub is_spam: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spam_keywords: Vec<String>,
}

impl From<&QualityAssessment> for QualityOverlay {
    fn from(assessment: &QualityAssessment) -> Self {
        Self {
            quality_score: assessment.quality_score,
            content_length: assessment.content_length,
            is_valid: assessment.is_valid,
            is_spam: assessment.is_spam,
            spam_keywords: assessment.spam_keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationOverlay {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_path: Option<Vec<String>>,
    pub confidence: f64,
    pub classification_method: String,
}

impl From<&ClassificationResult> for ClassificationOverlay {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            category: result.category.clone(),
            subcategory: result.subcategory.clone(),
            sub_subcategory: result.sub_subcategory.clone(),
            category_path: (!result.category_path.is_empty())
                .then(|| result.category_path.clone()),
            confidence: result.confidence,
            classification_method: result.method.to_string(),
        }
    }
}

/// The caller's record plus the additive fields produced by the pipeline.
/// Rejected records carry the quality overlay only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: ContentRecord,
    #[serde(flatten)]
    pub quality: Option<QualityOverlay>,
    #[serde(flatten)]
    pub classification: Option<ClassificationOverlay>,
}

impl EnrichedRecord {
    pub fn new(
        record: &ContentRecord,
        assessment: Option<&QualityAssessment>,
        classification: Option<&ClassificationResult>,
    ) -> Self {
        let mut record = record.clone();
        record
            .extra
            .retain(|key, _| !OVERLAY_KEYS.contains(&key.as_str()));
        Self {
            record,
            quality: assessment.map(QualityOverlay::from),
            classification: classification.map(ClassificationOverlay::from),
        }
    }

    pub fn is_classified(&self) -> bool {
        self.classification.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::types::ClassificationMethod;

    #[test]
    fn unknown_fields_pass_through() {
        let record: ContentRecord = serde_json::from_value(json!({
            "title": "标题",
            "content": null,
            "url": "https://example.com/a",
            "source": "zhihu"
        }))
        .unwrap();
        assert_eq!(record.content, "");

        let result = ClassificationResult::flat("finance", 1.0, ClassificationMethod::RuleBased);
        let enriched = EnrichedRecord::new(&record, None, Some(&result));
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["url"], "https://example.com/a");
        assert_eq!(value["source"], "zhihu");
        assert_eq!(value["category"], "finance");
        assert_eq!(value["classification_method"], "rule_based");
        assert!(value.get("category_path").is_none());
        assert!(value.get("quality_score").is_none());
    }

    #[test]
    fn stale_overlay_fields_are_replaced() {
        let record: ContentRecord = serde_json::from_value(json!({
            "title": "t",
            "content": "c",
            "category": "stale",
            "confidence": 0.1
        }))
        .unwrap();
        let result = ClassificationResult::flat("management", 0.9, ClassificationMethod::RuleBased);
        let enriched = EnrichedRecord::new(&record, None, Some(&result));
        let text = serde_json::to_string(&enriched).unwrap();
        assert_eq!(text.matches("\"category\"").count(), 1);
        assert!(!text.contains("stale"));
    }
}
