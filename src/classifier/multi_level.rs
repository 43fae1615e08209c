use std::sync::Arc;

use serde::Serialize;

use crate::{
    domain::{
        CategoryScore, ClassificationMethod, ClassificationResult, KeywordMatch, LevelConfidence,
    },
    taxonomy::{Taxonomy, TaxonomyStats},
};

use super::{
    scoring::{argmax, count_occurrences, normalize, round3, weighted_text},
    Recommendation, RuleScorer,
};

/// Per-keyword cap on the upper two levels.
const BRANCH_CAP: usize = 3;
/// Leaf keywords count 1.5 per hit, capped at 5.
const LEAF_HIT_WEIGHT: f64 = 1.5;
const LEAF_CAP: f64 = 5.0;

/// Overall confidence from per-level confidences. Leaf evidence weighs most.
pub fn blend_confidence(levels: &LevelConfidence) -> f64 {
    0.3 * levels.category + 0.3 * levels.subcategory + 0.4 * levels.sub_subcategory
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            Self::High
        } else if confidence > 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            Self::High => "分类置信度高，可直接使用",
            Self::Medium => "分类置信度中等，建议人工复核",
            Self::Low => "分类置信度低，建议人工分类或使用AI分类",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiLevelExplanation {
    pub title: String,
    pub classification: ClassificationResult,
    pub recommendation: Recommendation,
    pub confidence_level: ConfidenceBand,
    pub note: &'static str,
}

/// Scores the taxonomy top down: each level only considers the children of
/// the previous level's winner.
#[derive(Debug, Clone)]
pub struct MultiLevelClassifier {
    taxonomy: Arc<Taxonomy>,
}

impl MultiLevelClassifier {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        tracing::debug!(
            target: "classifier",
            leaves = taxonomy.leaf_count(),
            "multi-level classifier ready"
        );
        Self { taxonomy }
    }

    pub fn classify(&self, title: &str, content: &str) -> ClassificationResult {
        let text = weighted_text(title, content);

        let mut top: Vec<(String, f64)> = self
            .taxonomy
            .categories()
            .iter()
            .map(|cat| (cat.key.clone(), branch_score(&text, cat.keywords())))
            .collect();
        normalize(&mut top);
        let table: Vec<CategoryScore> = top
            .iter()
            .map(|(key, score)| CategoryScore {
                key: key.clone(),
                score: *score,
            })
            .collect();

        let Some(cat_idx) = argmax(&top) else {
            let mut result = ClassificationResult::other(ClassificationMethod::MultiLevelRuleBased);
            result.scores = table;
            return result;
        };
        let category = &self.taxonomy.categories()[cat_idx];
        let mut levels = LevelConfidence {
            category: round3(top[cat_idx].1),
            ..Default::default()
        };

        let mut second: Vec<(String, f64)> = category
            .subcategories
            .iter()
            .map(|sub| (sub.key.clone(), branch_score(&text, sub.keywords())))
            .collect();
        normalize(&mut second);
        let subcategory = argmax(&second).map(|idx| {
            levels.subcategory = round3(second[idx].1);
            &category.subcategories[idx]
        });

        let mut leaf = None;
        let mut matched_keywords = Vec::new();
        if let Some(sub) = subcategory {
            let mut third: Vec<(String, f64)> = sub
                .leaves
                .iter()
                .map(|leaf| {
                    let score: f64 = leaf
                        .keywords
                        .iter()
                        .map(|kw| {
                            let count = count_occurrences(&text, kw);
                            (count as f64 * LEAF_HIT_WEIGHT).min(LEAF_CAP)
                        })
                        .sum();
                    (leaf.key.clone(), score)
                })
                .collect();
            normalize(&mut third);
            if let Some(idx) = argmax(&third) {
                levels.sub_subcategory = round3(third[idx].1);
                let winner = &sub.leaves[idx];
                matched_keywords = winner
                    .keywords
                    .iter()
                    .filter_map(|kw| {
                        let count = count_occurrences(&text, kw);
                        (count > 0).then(|| KeywordMatch {
                            keyword: kw.clone(),
                            count,
                        })
                    })
                    .collect();
                leaf = Some(winner);
            }
        }

        let sub_key = subcategory.map(|sub| sub.key.clone());
        let leaf_key = leaf.map(|leaf| leaf.key.clone());
        ClassificationResult {
            category_path: self.taxonomy.category_path(
                &category.key,
                sub_key.as_deref(),
                leaf_key.as_deref(),
            ),
            category: category.key.clone(),
            subcategory: sub_key,
            sub_subcategory: leaf_key,
            confidence: blend_confidence(&levels),
            levels,
            matched_keywords,
            scores: table,
            reasoning: None,
            method: ClassificationMethod::MultiLevelRuleBased,
        }
    }

    pub fn explain(&self, title: &str, content: &str) -> MultiLevelExplanation {
        let classification = self.classify(title, content);
        let band = ConfidenceBand::for_confidence(classification.confidence);
        MultiLevelExplanation {
            title: title.to_string(),
            recommendation: Recommendation::for_confidence(classification.confidence),
            classification,
            confidence_level: band,
            note: band.note(),
        }
    }

    pub fn taxonomy_stats(&self) -> TaxonomyStats {
        self.taxonomy.stats()
    }
}

fn branch_score<'a>(text: &str, keywords: impl Iterator<Item = &'a str>) -> f64 {
    keywords
        .map(|kw| count_occurrences(text, kw).min(BRANCH_CAP))
        .sum::<usize>() as f64
}

impl RuleScorer for MultiLevelClassifier {
    fn classify(&self, title: &str, content: &str) -> ClassificationResult {
        MultiLevelClassifier::classify(self, title, content)
    }
}
