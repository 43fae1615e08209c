use std::sync::Arc;

use serde::Serialize;

use crate::{
    domain::{CategoryScore, ClassificationMethod, ClassificationResult, KeywordMatch},
    taxonomy::{ExclusionLists, KeywordRuleSet, OTHER},
};

use super::{
    scoring::{argmax, count_occurrences, normalize, round3, weighted_text},
    Recommendation, RuleScorer,
};

/// Repeats beyond this add nothing to a keyword's contribution.
const OCCURRENCE_CAP: usize = 5;

/// Weighted keyword scoring over the flat top-level categories.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Arc<KeywordRuleSet>,
    exclusions: Arc<ExclusionLists>,
    threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleExplanation {
    pub category: String,
    pub category_name: String,
    pub confidence: f64,
    pub method: ClassificationMethod,
    pub scores: Vec<CategoryScore>,
    pub matched_keywords: Vec<KeywordMatch>,
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_reasons: Vec<String>,
}

impl RuleClassifier {
    pub fn new(rules: Arc<KeywordRuleSet>, exclusions: Arc<ExclusionLists>, threshold: f64) -> Self {
        Self {
            rules,
            exclusions,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classify(&self, title: &str, content: &str) -> ClassificationResult {
        let text = weighted_text(title, content);

        let mut scores = Vec::with_capacity(self.rules.rules().len());
        let mut matches = Vec::with_capacity(self.rules.rules().len());
        for rule in self.rules.rules() {
            let mut score = 0.0;
            let mut matched = Vec::new();
            for (keyword, weight) in &rule.keywords {
                let count = count_occurrences(&text, keyword);
                if count > 0 {
                    score += weight * count.min(OCCURRENCE_CAP) as f64 / OCCURRENCE_CAP as f64;
                    matched.push(KeywordMatch {
                        keyword: keyword.clone(),
                        count,
                    });
                }
            }
            scores.push((rule.key.clone(), score));
            matches.push(matched);
        }
        normalize(&mut scores);

        let table = scores
            .iter()
            .map(|(key, score)| CategoryScore {
                key: key.clone(),
                score: *score,
            })
            .collect();

        let Some(best) = argmax(&scores) else {
            let mut result = ClassificationResult::other(ClassificationMethod::RuleBased);
            result.scores = table;
            return result;
        };

        let confidence = round3(scores[best].1);
        let mut result = if confidence < self.threshold {
            // demoted: the confidence still describes the discarded pick
            ClassificationResult::flat(OTHER, confidence, ClassificationMethod::RuleBased)
        } else {
            let mut result = ClassificationResult::flat(
                scores[best].0.clone(),
                confidence,
                ClassificationMethod::RuleBased,
            );
            result.matched_keywords = std::mem::take(&mut matches[best]);
            result.category_path = vec![self.rules.display_name(&result.category).to_string()];
            result
        };
        result.scores = table;
        result
    }

    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.rules.display_name(key)
    }

    /// Exclusion keywords found in the text, as `reason:keyword`. Empty when
    /// the record may be kept.
    pub fn should_filter(&self, title: &str, content: &str) -> Vec<String> {
        self.exclusions.matches(title, content)
    }

    pub fn explain(&self, title: &str, content: &str) -> RuleExplanation {
        let result = self.classify(title, content);
        let filter_reasons = self.should_filter(title, content);
        let recommendation = if !filter_reasons.is_empty() {
            Recommendation::Reject
        } else {
            Recommendation::for_confidence(result.confidence)
        };

        RuleExplanation {
            category_name: self.display_name(&result.category).to_string(),
            category: result.category,
            confidence: result.confidence,
            method: result.method,
            scores: result.scores,
            matched_keywords: result.matched_keywords,
            recommendation,
            filter_reasons,
        }
    }
}

impl RuleScorer for RuleClassifier {
    fn classify(&self, title: &str, content: &str) -> ClassificationResult {
        RuleClassifier::classify(self, title, content)
    }
}

#[cfg(test)]
mod tests {
    use crate::taxonomy::{KeywordRule, OTHER_DISPLAY_NAME};

    use super::*;

    fn builtin(threshold: f64) -> RuleClassifier {
        RuleClassifier::new(
            Arc::new(KeywordRuleSet::builtin()),
            Arc::new(ExclusionLists::builtin()),
            threshold,
        )
    }

    fn two_rules() -> Arc<KeywordRuleSet> {
        Arc::new(
            KeywordRuleSet::new(vec![
                KeywordRule {
                    key: "alpha".into(),
                    name: "甲".into(),
                    keywords: vec![("苹果".into(), 1.0), ("香蕉".into(), 0.5)],
                },
                KeywordRule {
                    key: "beta".into(),
                    name: "乙".into(),
                    keywords: vec![("橙子".into(), 1.0)],
                },
            ])
            .unwrap(),
        )
    }

    #[test]
    fn empty_text_is_other_with_zero_confidence() {
        let result = builtin(0.7).classify("", "");
        assert_eq!(result.category, "other");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, ClassificationMethod::RuleBased);
        assert!(result.scores.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn best_category_is_normalized_to_one() {
        let result = builtin(0.7).classify(
            "焦虑与抑郁的心理咨询",
            "心理咨询师通过认知行为疗法帮助来访者缓解焦虑情绪。",
        );
        assert_eq!(result.category, "psychology");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.category_path, vec!["心理咨询".to_string()]);
        assert!(result.matched_keywords.iter().any(|m| m.keyword == "心理咨询"));
        let top = result.scores.iter().find(|s| s.key == "psychology").unwrap();
        assert_eq!(top.score, 1.0);
    }

    #[test]
    fn occurrences_saturate_at_five() {
        let classifier = RuleClassifier::new(two_rules(), Arc::new(ExclusionLists::default()), 0.0);
        // title counted twice: 苹果 appears 2 + 4 = 6 times, capped at 5 → 1.0
        // 橙子 appears 3 times → 0.6, normalized 0.6
        let result = classifier.classify("苹果", "苹果苹果苹果苹果 橙子橙子橙子");
        assert_eq!(result.category, "alpha");
        let beta = result.scores.iter().find(|s| s.key == "beta").unwrap();
        assert!((beta.score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn raising_strongest_keyword_count_never_lowers_its_score() {
        let classifier = RuleClassifier::new(two_rules(), Arc::new(ExclusionLists::default()), 0.0);
        let mut previous = 0.0;
        for n in 1..=7 {
            let content = format!("{} 橙子橙子", "苹果".repeat(n));
            let result = classifier.classify("", &content);
            let alpha = result.scores.iter().find(|s| s.key == "alpha").unwrap().score;
            assert!(alpha >= previous, "count {n}: {alpha} < {previous}");
            previous = alpha;
        }
    }

    #[test]
    fn ties_go_to_the_first_category() {
        let classifier = RuleClassifier::new(two_rules(), Arc::new(ExclusionLists::default()), 0.0);
        let result = classifier.classify("", "苹果 橙子");
        assert_eq!(result.category, "alpha");
    }

    #[test]
    fn low_confidence_is_demoted_but_reported() {
        let classifier = RuleClassifier::new(two_rules(), Arc::new(ExclusionLists::default()), 1.1);
        let result = classifier.classify("", "苹果");
        assert_eq!(result.category, "other");
        assert_eq!(result.confidence, 1.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let classifier = builtin(0.7);
        let title = "企业预算管理与成本控制";
        let content = "财务预算、成本核算和现金流管理是企业财务管理的核心。";
        assert_eq!(classifier.classify(title, content), classifier.classify(title, content));
    }

    #[test]
    fn display_names_cover_other_and_unknown() {
        let classifier = builtin(0.7);
        assert_eq!(classifier.display_name("management"), "企业管理");
        assert_eq!(classifier.display_name("other"), OTHER_DISPLAY_NAME);
        assert_eq!(classifier.display_name("sports"), "sports");
    }

    #[test]
    fn explain_rejects_filtered_content() {
        let classifier = builtin(0.7);
        let explanation = classifier.explain("心理咨询", "专业心理咨询，加微信预约");
        assert_eq!(explanation.recommendation, Recommendation::Reject);
        assert!(explanation.filter_reasons.contains(&"spam:加微信".to_string()));

        let clean = classifier.explain("心理咨询", "专业心理咨询与心理治疗");
        assert_eq!(clean.recommendation, Recommendation::Accept);
        assert_eq!(clean.category_name, "心理咨询");
        assert!(clean.filter_reasons.is_empty());
    }
}
