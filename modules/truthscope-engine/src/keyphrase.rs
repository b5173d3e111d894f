//! Statistical key-phrase extraction with optional embedding enrichment.
//!
//! The primary pass is deterministic n-gram scoring (word frequency plus a
//! positional bonus over stop-word-free runs) and needs no model. When an
//! embedder is available, candidates are re-ranked by combining the
//! statistical score with cosine similarity to the whole document, so
//! phrases supported by both signals rise. Extraction never fails: an
//! unavailable or broken embedder degrades to the statistical ranking, and
//! blank input yields an empty set.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::similarity::{cosine_similarity, TextEmbedder};
use crate::text::{is_stop_word, preprocess, tokenize};

/// Longest phrase, in words.
const MAX_PHRASE_WORDS: usize = 3;
/// Candidate pool multiplier before the cap is applied, so enrichment has
/// phrases to re-rank.
const CANDIDATE_POOL_FACTOR: usize = 3;
/// Weights for combining statistical rank with embedding similarity.
const STATISTICAL_WEIGHT: f64 = 0.6;
const SEMANTIC_WEIGHT: f64 = 0.4;

/// Ordered, deduplicated key phrases, most salient first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPhraseSet {
    phrases: Vec<String>,
}

impl KeyPhraseSet {
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|p| p.as_str())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.phrases
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.phrases.clone()
    }

    /// Space-joined form used as the search query.
    pub fn join(&self) -> String {
        self.phrases.join(" ")
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    phrase: String,
    score: f64,
}

/// Extract up to `max_phrases` key phrases using statistical scoring only.
pub fn extract(text: &str, max_phrases: usize) -> KeyPhraseSet {
    let mut candidates = score_candidates(text);
    candidates.truncate(max_phrases);
    KeyPhraseSet {
        phrases: candidates.into_iter().map(|c| c.phrase).collect(),
    }
}

/// Extract with embedding enrichment when an embedder is available.
/// Embedder failures are logged and skipped; the statistical ranking is
/// always a valid outcome.
pub async fn extract_enriched(
    text: &str,
    max_phrases: usize,
    embedder: Option<&Arc<dyn TextEmbedder>>,
) -> KeyPhraseSet {
    let mut candidates = score_candidates(text);
    candidates.truncate(max_phrases.saturating_mul(CANDIDATE_POOL_FACTOR));

    if let Some(embedder) = embedder {
        if candidates.len() > 1 {
            match rerank_with_embeddings(text, &candidates, embedder.as_ref()).await {
                Ok(reranked) => candidates = reranked,
                Err(e) => {
                    warn!(error = %e, "Key-phrase enrichment unavailable, keeping statistical ranking");
                }
            }
        }
    }

    candidates.truncate(max_phrases);
    KeyPhraseSet {
        phrases: candidates.into_iter().map(|c| c.phrase).collect(),
    }
}

/// Score all 1..=3-gram candidates, deduplicated by normalized lowercase
/// form, sorted by score descending with first-seen order breaking ties.
fn score_candidates(text: &str) -> Vec<Candidate> {
    let cleaned = preprocess(text);
    let tokens = tokenize(&cleaned);
    if tokens.is_empty() {
        return Vec::new();
    }

    // Word frequency over content words only.
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for token in tokens.iter().filter(|t| !is_stop_word(t)) {
        *freq.entry(token.as_str()).or_insert(0) += 1;
    }

    // Contiguous stop-word-free runs with their starting positions.
    let mut runs: Vec<(usize, Vec<&str>)> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if is_stop_word(token) || token.chars().all(|c| c.is_numeric()) {
            if !current.is_empty() {
                runs.push((current_start, std::mem::take(&mut current)));
            }
        } else {
            if current.is_empty() {
                current_start = i;
            }
            current.push(token.as_str());
        }
    }
    if !current.is_empty() {
        runs.push((current_start, current));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    for (run_start, run) in &runs {
        for n in 1..=MAX_PHRASE_WORDS.min(run.len()) {
            for (offset, window) in run.windows(n).enumerate() {
                let phrase = window.join(" ");
                if !seen.insert(phrase.clone()) {
                    continue;
                }

                let first_index = run_start + offset;
                let freq_score = window
                    .iter()
                    .map(|w| *freq.get(*w).unwrap_or(&0) as f64)
                    .sum::<f64>()
                    / n as f64;
                let position_score = 1.0 / (1.0 + first_index as f64 / 8.0);
                let length_bonus = 1.0 + 0.15 * (n as f64 - 1.0);

                candidates.push(Candidate {
                    phrase,
                    score: (freq_score + position_score) * length_bonus,
                });
            }
        }
    }

    // Stable sort keeps first-seen (document) order for equal scores.
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Re-rank candidates by combining the normalized statistical score with
/// cosine similarity between each phrase and the whole document.
async fn rerank_with_embeddings(
    text: &str,
    candidates: &[Candidate],
    embedder: &dyn TextEmbedder,
) -> anyhow::Result<Vec<Candidate>> {
    let mut inputs: Vec<String> = Vec::with_capacity(candidates.len() + 1);
    inputs.push(text.to_string());
    inputs.extend(candidates.iter().map(|c| c.phrase.clone()));

    let vectors = embedder.embed_batch(inputs).await?;
    let (doc_vector, phrase_vectors) = vectors
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("empty embedding response"))?;
    if phrase_vectors.len() != candidates.len() {
        anyhow::bail!(
            "expected {} phrase embeddings, got {}",
            candidates.len(),
            phrase_vectors.len()
        );
    }

    let max_stat = candidates
        .iter()
        .map(|c| c.score)
        .fold(f64::MIN, f64::max)
        .max(f64::EPSILON);

    let mut reranked: Vec<Candidate> = candidates
        .iter()
        .zip(phrase_vectors)
        .map(|(c, v)| {
            let semantic = cosine_similarity(doc_vector, v).clamp(0.0, 1.0);
            Candidate {
                phrase: c.phrase.clone(),
                score: STATISTICAL_WEIGHT * (c.score / max_stat) + SEMANTIC_WEIGHT * semantic,
            }
        })
        .collect();

    reranked
        .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(reranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const HEADLINE: &str =
        "Delhi weather sees sudden turn: Rain, dust storms bring temperatures down in capital";

    #[test]
    fn empty_text_yields_empty_set() {
        assert!(extract("", 10).is_empty());
        assert!(extract("   \n  ", 10).is_empty());
    }

    #[test]
    fn extraction_is_deterministic_and_capped() {
        let a = extract(HEADLINE, 5);
        let b = extract(HEADLINE, 5);
        assert_eq!(a, b);
        assert!(a.len() <= 5);
        assert!(!a.is_empty());
    }

    #[test]
    fn phrases_are_deduplicated_and_stop_word_free_at_edges() {
        let set = extract("flu cases flu cases flu cases rising", 20);
        let phrases: Vec<&str> = set.iter().collect();
        let unique: HashSet<&&str> = phrases.iter().collect();
        assert_eq!(phrases.len(), unique.len());
        for phrase in &phrases {
            assert!(!phrase.starts_with("the "), "{phrase}");
            assert!(!is_stop_word(phrase), "{phrase}");
        }
    }

    #[test]
    fn repeated_terms_rank_first() {
        let text = "flu outbreak spreads. flu outbreak worsens. flu outbreak continues. \
                    weather unrelated note";
        let set = extract(text, 3);
        let top: Vec<&str> = set.iter().collect();
        assert!(top[0].contains("flu") || top[0].contains("outbreak"), "{top:?}");
    }

    #[test]
    fn multi_word_phrases_survive_extraction() {
        let set = extract(HEADLINE, 10);
        assert!(
            set.iter().any(|p| p.split_whitespace().count() > 1),
            "{:?}",
            set.to_vec()
        );
    }

    struct FailingEmbedder;

    #[async_trait::async_trait]
    impl TextEmbedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            anyhow::bail!("down")
        }

        async fn embed_batch(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
            anyhow::bail!("down")
        }
    }

    #[tokio::test]
    async fn enrichment_failure_degrades_to_statistical_ranking() {
        let embedder: Arc<dyn TextEmbedder> = Arc::new(FailingEmbedder);
        let enriched = extract_enriched(HEADLINE, 5, Some(&embedder)).await;
        let statistical = extract(HEADLINE, 5);
        assert_eq!(enriched, statistical);
    }

    #[tokio::test]
    async fn no_embedder_matches_statistical_ranking() {
        let enriched = extract_enriched(HEADLINE, 5, None).await;
        assert_eq!(enriched, extract(HEADLINE, 5));
    }
}
