//! Text cleaning, heuristic quality scoring and spam/ad detection.

pub mod markup;
pub mod text;

use std::sync::Arc;

use crate::{
    config::QualityConfig,
    domain::{ContentRecord, QualityAssessment},
    taxonomy::ExclusionLists,
};

const CJK_PUNCTUATION: &[char] = &[
    '，', '。', '！', '？', '；', '：', '"', '“', '”', '‘', '’', '《', '》', '（', '）',
];

#[derive(Debug, Clone)]
pub struct QualityFilter {
    config: QualityConfig,
    exclusions: Arc<ExclusionLists>,
}

impl QualityFilter {
    pub fn new(config: QualityConfig, exclusions: Arc<ExclusionLists>) -> Self {
        Self { config, exclusions }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Cleans, scores and spam-checks one record. Never fails: empty input
    /// simply scores 0 and is invalid.
    pub fn assess(&self, title: &str, content: &str) -> QualityAssessment {
        let raw = if markup::looks_like_markup(content) {
            markup::extract_text(content)
        } else {
            content.to_string()
        };
        let content = text::remove_duplicates(&text::clean_text(&raw));
        let title = text::clean_title(title);

        let quality_score = self.quality_score(&content, &title);
        let spam_keywords = self.check_spam(&title, &content);
        let is_spam = !spam_keywords.is_empty();
        let content_length = content.chars().count();

        let is_valid = content_length >= self.config.min_length
            && content_length <= self.config.max_length
            && !is_spam
            && quality_score >= self.config.min_quality_score;

        QualityAssessment {
            title,
            content,
            content_length,
            quality_score,
            is_valid,
            is_spam,
            spam_keywords,
        }
    }

    /// Every configured spam/ad keyword found in `title` or `content`, as
    /// `reason:keyword`.
    pub fn check_spam(&self, title: &str, content: &str) -> Vec<String> {
        self.exclusions.matches(title, content)
    }

    /// Additive heuristic score in [0, 1]: length 0.3, title 0.1,
    /// paragraph structure 0.2, character richness 0.2, punctuation 0.2.
    pub fn quality_score(&self, content: &str, title: &str) -> f64 {
        if content.is_empty() {
            return 0.0;
        }

        let length = content.chars().count();
        let (min, max) = (self.config.min_length as f64, self.config.max_length as f64);
        let len = length as f64;
        let length_score = if len >= min && len <= max {
            1.0
        } else if len < min {
            len / min
        } else {
            (1.0 - (len - max) / max).max(0.5)
        };
        let mut score = length_score * 0.3;

        if title.chars().count() >= 10 {
            score += 0.1;
        }

        let paragraphs = content.split('\n').filter(|p| !p.trim().is_empty()).count();
        if paragraphs >= 3 {
            score += 0.2;
        } else if paragraphs >= 1 {
            score += 0.1;
        }

        let mut cjk = 0usize;
        let mut latin = 0usize;
        let digits = text::decimal_digit_count(content);
        let mut punctuation = 0usize;
        for ch in content.chars() {
            if ('\u{4e00}'..='\u{9fff}').contains(&ch) {
                cjk += 1;
            } else if ch.is_ascii_alphabetic() {
                latin += 1;
            } else if CJK_PUNCTUATION.contains(&ch) {
                punctuation += 1;
            }
        }

        if cjk > 100 {
            score += 0.1;
        }
        if latin > 10 || digits > 5 {
            score += 0.1;
        }

        let punctuation = punctuation as f64;
        if punctuation > len / 50.0 {
            score += 0.2;
        } else if punctuation > len / 100.0 {
            score += 0.1;
        }

        score.min(1.0)
    }

    /// Assesses every record and keeps only the valid ones, logging why the
    /// others were dropped.
    pub fn clean_batch<'a>(
        &self,
        records: &'a [ContentRecord],
    ) -> Vec<(&'a ContentRecord, QualityAssessment)> {
        records
            .iter()
            .filter_map(|record| {
                let assessment = self.assess(&record.title, &record.content);
                if assessment.is_valid {
                    Some((record, assessment))
                } else {
                    tracing::warn!(
                        target: "quality",
                        title = %preview(&record.title),
                        spam = assessment.is_spam,
                        quality = format_args!("{:.2}", assessment.quality_score),
                        length = assessment.content_length,
                        "record filtered out"
                    );
                    None
                }
            })
            .collect()
    }
}

/// First 50 characters, for log lines.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
