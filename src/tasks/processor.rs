use std::{collections::BTreeMap, sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::{
    classifier::Classifier,
    domain::{ContentRecord, EnrichedRecord},
    quality::{preview, QualityFilter},
};

const PROGRESS_EVERY: usize = 10;

/// Runs quality filtering and then classification over a batch, one record
/// at a time. Always yields one output per input.
pub struct BatchProcessor {
    filter: QualityFilter,
    classifier: Arc<Classifier>,
    llm_delay: Duration,
}

#[derive(Debug, Default)]
struct BatchSummary {
    total: usize,
    rejected: usize,
    spam: usize,
    per_category: BTreeMap<String, usize>,
}

impl BatchProcessor {
    pub fn new(filter: QualityFilter, classifier: Arc<Classifier>, llm_delay: Duration) -> Self {
        Self {
            filter,
            classifier,
            llm_delay,
        }
    }

    pub fn filter(&self) -> &QualityFilter {
        &self.filter
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Records that fail the quality gate come back with their assessment
    /// only; the rest are classified on their cleaned text.
    pub async fn process(&self, records: &[ContentRecord]) -> Vec<EnrichedRecord> {
        let total = records.len();
        tracing::info!(
            target: "processor",
            total,
            classifier = self.classifier.name(),
            "processing batch"
        );

        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };
        let mut out = Vec::with_capacity(total);
        let mut classified = 0usize;

        for (idx, record) in records.iter().enumerate() {
            let assessment = self.filter.assess(&record.title, &record.content);
            if !assessment.is_valid {
                summary.rejected += 1;
                if assessment.is_spam {
                    summary.spam += 1;
                }
                tracing::debug!(
                    target: "processor",
                    title = %preview(&record.title),
                    spam = assessment.is_spam,
                    quality = assessment.quality_score,
                    "record rejected by quality filter"
                );
                out.push(EnrichedRecord::new(record, Some(&assessment), None));
            } else {
                if self.classifier.is_llm() && classified > 0 && !self.llm_delay.is_zero() {
                    sleep(self.llm_delay).await;
                }
                let result = self
                    .classifier
                    .classify(&assessment.title, &assessment.content)
                    .await;
                classified += 1;
                *summary.per_category.entry(result.category.clone()).or_default() += 1;
                out.push(EnrichedRecord::new(record, Some(&assessment), Some(&result)));
            }

            if (idx + 1) % PROGRESS_EVERY == 0 {
                tracing::info!(target: "processor", done = idx + 1, total, "batch progress");
            }
        }

        tracing::info!(
            target: "processor",
            total = summary.total,
            classified,
            rejected = summary.rejected,
            spam = summary.spam,
            categories = ?summary.per_category,
            "batch finished"
        );
        out
    }

    /// Quality assessment only, for inspecting what the filter would drop.
    pub fn assess(&self, records: &[ContentRecord]) -> Vec<EnrichedRecord> {
        records
            .iter()
            .map(|record| {
                let assessment = self.filter.assess(&record.title, &record.content);
                EnrichedRecord::new(record, Some(&assessment), None)
            })
            .collect()
    }
}
