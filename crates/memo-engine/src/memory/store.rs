//! In-memory store of historical deliberation records

use super::similarity::rank_similarity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Terminal outcome attached to a historical record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Label used for grouping in analytics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A historical memo's indexed text plus its labelled outcome
///
/// Created when a memo is finalized; the outcome and metrics are attached
/// later by an external caller once known. Records without an outcome are
/// excluded from the similarity pool entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityRecord {
    pub memo_id: String,
    pub ticker: String,
    pub investment_thesis: String,
    pub risk_assessment: String,
    /// The memo's recommendation at sealing time
    pub decision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome_date: Option<DateTime<Utc>>,
    /// Named performance metrics, e.g. `return_pct`
    #[serde(default)]
    pub performance_metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SimilarityRecord {
    /// The text this record is indexed under
    pub fn similarity_text(&self) -> String {
        format!("{} {}", self.investment_thesis, self.risk_assessment)
    }
}

/// A retrieval hit: the record plus its cosine similarity to the candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarMemo {
    pub record: SimilarityRecord,
    pub similarity: f64,
}

/// Append-only historical store backing similarity retrieval
///
/// The only state shared across concurrent deliberations. Writes are
/// insert-or-replace keyed by memo id; outcome attachment is the one
/// permitted later mutation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, SimilarityRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record by memo id
    pub fn store(&self, record: SimilarityRecord) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(record.memo_id.clone(), record);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attach an outcome to a stored record
    ///
    /// Idempotent by identifier; returns false when the id is unknown.
    pub fn attach_outcome(
        &self,
        memo_id: &str,
        outcome: Outcome,
        performance_metrics: BTreeMap<String, f64>,
    ) -> bool {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(memo_id) {
            Some(record) => {
                record.outcome = Some(outcome);
                record.outcome_date = Some(Utc::now());
                record.performance_metrics = performance_metrics;
                true
            }
            None => false,
        }
    }

    /// Retrieve the most similar outcome-labelled records for a candidate
    ///
    /// Scores the candidate jointly against the eligible pool, keeps hits
    /// at or above `min_similarity`, and returns the top `limit` sorted by
    /// similarity descending.
    pub fn find_similar(
        &self,
        candidate_text: &str,
        limit: usize,
        min_similarity: f64,
    ) -> Vec<SimilarMemo> {
        let pool: Vec<SimilarityRecord> = {
            let records = self
                .records
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            records
                .values()
                .filter(|r| r.outcome.is_some())
                .cloned()
                .collect()
        };

        if pool.is_empty() {
            return Vec::new();
        }

        let corpus: Vec<String> = pool.iter().map(SimilarityRecord::similarity_text).collect();
        let scores = rank_similarity(candidate_text, &corpus);

        let mut hits: Vec<SimilarMemo> = pool
            .into_iter()
            .zip(scores)
            .filter(|(_, score)| *score >= min_similarity)
            .map(|(record, similarity)| SimilarMemo { record, similarity })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        hits
    }

    /// The most recent outcome-labelled records, newest first
    pub fn labelled_recent(&self, limit: usize) -> Vec<SimilarityRecord> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut labelled: Vec<SimilarityRecord> = records
            .values()
            .filter(|r| r.outcome.is_some())
            .cloned()
            .collect();
        labelled.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        labelled.truncate(limit);
        labelled
    }

    /// Snapshot of every record (analytics input)
    pub(crate) fn snapshot(&self) -> Vec<SimilarityRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, thesis: &str, outcome: Option<Outcome>) -> SimilarityRecord {
        SimilarityRecord {
            memo_id: id.to_string(),
            ticker: "AAPL".to_string(),
            investment_thesis: thesis.to_string(),
            risk_assessment: "manageable downside".to_string(),
            decision: "Buy".to_string(),
            outcome,
            outcome_date: None,
            performance_metrics: BTreeMap::new(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_store_is_insert_or_replace() {
        let store = MemoryStore::new();
        store.store(record("m1", "first thesis", None));
        store.store(record("m1", "revised thesis", None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unlabelled_records_excluded_from_pool() {
        let store = MemoryStore::new();
        store.store(record("m1", "cloud growth accelerating", None));
        let hits = store.find_similar("cloud growth accelerating manageable downside", 10, 0.3);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_identical_candidate_included() {
        let store = MemoryStore::new();
        let rec = record("m1", "cloud growth accelerating", Some(Outcome::Success));
        let text = rec.similarity_text();
        store.store(rec);

        let hits = store.find_similar(&text, 10, 0.3);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_overlap_excluded_at_default_threshold() {
        let store = MemoryStore::new();
        store.store(record(
            "m1",
            "industrial automation rollout",
            Some(Outcome::Failure),
        ));
        let hits = store.find_similar("biotech trial readout imminent", 10, 0.3);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_sorted_descending_and_limited() {
        let store = MemoryStore::new();
        store.store(record(
            "m1",
            "cloud margin expansion drives thesis",
            Some(Outcome::Success),
        ));
        store.store(record(
            "m2",
            "cloud margin expansion drives thesis today",
            Some(Outcome::Success),
        ));
        store.store(record(
            "m3",
            "cloud margin note",
            Some(Outcome::Failure),
        ));

        let hits = store.find_similar(
            "cloud margin expansion drives thesis manageable downside",
            2,
            0.0,
        );
        assert_eq!(hits.len(), 2);
        assert!(hits[0].similarity >= hits[1].similarity);
    }

    #[test]
    fn test_attach_outcome_idempotent() {
        let store = MemoryStore::new();
        store.store(record("m1", "thesis", None));

        let mut metrics = BTreeMap::new();
        metrics.insert("return_pct".to_string(), 12.5);

        assert!(store.attach_outcome("m1", Outcome::Success, metrics.clone()));
        assert!(store.attach_outcome("m1", Outcome::Success, metrics));
        assert!(!store.attach_outcome("unknown", Outcome::Failure, BTreeMap::new()));

        let labelled = store.labelled_recent(10);
        assert_eq!(labelled.len(), 1);
        assert_eq!(labelled[0].outcome, Some(Outcome::Success));
        assert_eq!(labelled[0].performance_metrics.get("return_pct"), Some(&12.5));
    }
}
