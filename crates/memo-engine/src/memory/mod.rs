//! Memory and similarity retrieval
//!
//! Finalized memos are indexed by their thesis+risk text; new deliberations
//! retrieve the nearest outcome-labelled precedents and feed synthesized
//! insight text back into their context. Outcomes arrive later, attached by
//! an external caller, and retrieval never depends on them beyond the
//! eligibility filter.

pub mod analytics;
pub mod insights;
pub mod similarity;
pub mod store;

pub use analytics::{PerformanceAnalytics, TimeWindow, performance_analytics};
pub use insights::{CandidateMemo, InsightMode, InsightReport, LearningInsights, MemorySubsystem};
pub use store::{MemoryStore, Outcome, SimilarMemo, SimilarityRecord};
