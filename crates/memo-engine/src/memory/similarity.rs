//! Lexical similarity over memo text
//!
//! Retrieval builds a TF-IDF vector space per query over the candidate text
//! plus every eligible historical text, so the vocabulary is always shared.
//! Rebuilding per query keeps the index trivially consistent; retrieval is
//! off the hot path relative to provider latency, so the O(corpus) cost is
//! acceptable. Tokens are lowercased word characters of length >= 2,
//! stopword-filtered, expanded into unigrams and bigrams, with the
//! vocabulary capped at the most frequent terms corpus-wide.

use std::collections::HashMap;

/// Vocabulary cap, most frequent terms first
const MAX_FEATURES: usize = 1000;

/// Common English stopwords excluded from the vocabulary
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your", "yours", "yourself",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Tokenize into stopword-filtered unigrams and bigrams
fn terms(text: &str) -> Vec<String> {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 2 && !is_stopword(w))
        .map(str::to_string)
        .collect();

    let mut terms = words.clone();
    for pair in words.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// A sparse TF-IDF document vector, L2-normalized
type DocVector = HashMap<usize, f64>;

fn build_vocabulary(documents: &[Vec<String>]) -> HashMap<String, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        for term in doc {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    // Most frequent first; ties resolved lexicographically so the space is
    // deterministic
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(MAX_FEATURES);

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (term, _))| (term.to_string(), index))
        .collect()
}

fn vectorize(doc: &[String], vocabulary: &HashMap<String, usize>, idf: &[f64]) -> DocVector {
    let mut tf: HashMap<usize, f64> = HashMap::new();
    for term in doc {
        if let Some(&index) = vocabulary.get(term) {
            *tf.entry(index).or_insert(0.0) += 1.0;
        }
    }

    for (index, weight) in &mut tf {
        *weight *= idf[*index];
    }

    let norm = tf.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in tf.values_mut() {
            *weight /= norm;
        }
    }
    tf
}

fn cosine(a: &DocVector, b: &DocVector) -> f64 {
    // Vectors are already L2-normalized, so cosine reduces to a dot product
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(index, wa)| large.get(index).map(|wb| wa * wb))
        .sum()
}

/// Score the candidate against every corpus text
///
/// The vector space (vocabulary and idf weights) is computed jointly over
/// candidate + corpus. Returns one cosine similarity in [0, 1] per corpus
/// text, in input order. An empty candidate or corpus text scores 0 against
/// everything.
pub fn rank_similarity(candidate: &str, corpus: &[String]) -> Vec<f64> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let mut documents: Vec<Vec<String>> = Vec::with_capacity(corpus.len() + 1);
    documents.push(terms(candidate));
    documents.extend(corpus.iter().map(|text| terms(text)));

    let vocabulary = build_vocabulary(&documents);

    // Smoothed idf: ln((1 + n) / (1 + df)) + 1
    let n_docs = documents.len() as f64;
    let mut df = vec![0usize; vocabulary.len()];
    for doc in &documents {
        let mut seen = vec![false; vocabulary.len()];
        for term in doc {
            if let Some(&index) = vocabulary.get(term) {
                if !seen[index] {
                    seen[index] = true;
                    df[index] += 1;
                }
            }
        }
    }
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    let candidate_vector = vectorize(&documents[0], &vocabulary, &idf);
    documents[1..]
        .iter()
        .map(|doc| cosine(&candidate_vector, &vectorize(doc, &vocabulary, &idf)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_scores_one() {
        let text = "strong revenue growth with widening margins and buybacks";
        let scores = rank_similarity(text, &[text.to_string()]);
        assert_eq!(scores.len(), 1);
        assert!((scores[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_overlap_scores_zero() {
        let scores = rank_similarity(
            "semiconductor capacity expansion",
            &["dairy futures hedging strategy".to_string()],
        );
        assert!(scores[0].abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap_between_zero_and_one() {
        let scores = rank_similarity(
            "revenue growth accelerating",
            &["revenue growth slowing down materially".to_string()],
        );
        assert!(scores[0] > 0.0);
        assert!(scores[0] < 1.0);
    }

    #[test]
    fn test_more_overlap_ranks_higher() {
        let corpus = vec![
            "cloud margin expansion drives the thesis".to_string(),
            "unrelated retail inventory cycle".to_string(),
        ];
        let scores = rank_similarity("cloud margin expansion continues", &corpus);
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_deterministic() {
        let corpus = vec!["alpha beta gamma".to_string(), "beta gamma delta".to_string()];
        let first = rank_similarity("beta gamma", &corpus);
        let second = rank_similarity("beta gamma", &corpus);
        assert_eq!(first, second);
    }

    #[test]
    fn test_stopwords_ignored() {
        // Overlap only in stopwords must not produce similarity
        let scores = rank_similarity(
            "the and of with strong quarter",
            &["the and of with weak outlook".to_string()],
        );
        assert!(scores[0].abs() < 1e-12);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(rank_similarity("anything", &[]).is_empty());
    }

    #[test]
    fn test_bigrams_contribute() {
        // Same unigrams, different order: bigram mismatch lowers the score
        // below a corpus text with identical phrasing
        let corpus = vec![
            "margin pressure easing".to_string(),
            "easing pressure margin".to_string(),
        ];
        let scores = rank_similarity("margin pressure easing", &corpus);
        assert!(scores[0] > scores[1]);
    }
}
