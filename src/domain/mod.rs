pub mod record;
pub mod types;

pub use record::{ClassificationOverlay, ContentRecord, EnrichedRecord, QualityOverlay};
pub use types::{
    CategoryScore, ClassificationMethod, ClassificationResult, KeywordMatch, LevelConfidence,
    QualityAssessment,
};
