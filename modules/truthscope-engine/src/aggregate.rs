//! Credibility aggregation: extract keywords once, score every candidate
//! against the input, weight by source trust, sum into a total, classify.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::info;

use truthscope_common::{
    domain_of, normalize_url, round3, CandidateArticle, CredibilityLevel, CredibilityReport,
    CredibilitySummary, InputDocument, InputSummary, SourceScore, TruthScopeError, WeightedSource,
};

use crate::keyphrase::{self, KeyPhraseSet};
use crate::similarity::{SimilarityScorer, TextEmbedder};
use crate::weights::SourceWeights;

/// Ascending score thresholds, closed on the lower bound.
#[derive(Debug, Clone, Copy)]
pub struct CredibilityThresholds {
    pub high: f64,
    pub moderate: f64,
    pub fair: f64,
    pub low: f64,
}

impl Default for CredibilityThresholds {
    fn default() -> Self {
        Self {
            high: 12.0,
            moderate: 8.0,
            fair: 5.0,
            low: 2.0,
        }
    }
}

impl CredibilityThresholds {
    /// Pure function of the total score.
    pub fn classify(&self, total_score: f64) -> CredibilityLevel {
        if total_score >= self.high {
            CredibilityLevel::High
        } else if total_score >= self.moderate {
            CredibilityLevel::Moderate
        } else if total_score >= self.fair {
            CredibilityLevel::Fair
        } else if total_score >= self.low {
            CredibilityLevel::Low
        } else {
            CredibilityLevel::VeryLow
        }
    }
}

/// Engine configuration. All knobs are injected here, never hard-coded in
/// the algorithm bodies.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub max_phrases: usize,
    pub semantic_enabled: bool,
    pub embed_timeout: Duration,
    pub thresholds: CredibilityThresholds,
    /// Bound on concurrent per-candidate scoring.
    pub concurrency: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_phrases: 10,
            semantic_enabled: true,
            embed_timeout: Duration::from_secs(20),
            thresholds: CredibilityThresholds::default(),
            concurrency: 8,
        }
    }
}

pub struct Aggregator {
    scorer: SimilarityScorer,
    weights: SourceWeights,
    embedder: Option<Arc<dyn TextEmbedder>>,
    config: ScoringConfig,
}

impl Aggregator {
    pub fn new(
        config: ScoringConfig,
        weights: SourceWeights,
        embedder: Option<Arc<dyn TextEmbedder>>,
    ) -> Self {
        let scorer = SimilarityScorer::new(embedder.clone(), config.semantic_enabled)
            .with_embed_timeout(config.embed_timeout);
        Self {
            scorer,
            weights,
            embedder,
            config,
        }
    }

    /// Extract key phrases from the input, preferring the headline over the
    /// body to bias toward the claim being verified. The only fatal error
    /// of the engine: an input with no extractable text at all.
    pub async fn extract_keywords(
        &self,
        input: &InputDocument,
    ) -> Result<KeyPhraseSet, TruthScopeError> {
        if !input.has_text() {
            return Err(TruthScopeError::EmptyInput);
        }

        let basis = if !input.headline.trim().is_empty() {
            input.headline.as_str()
        } else {
            input.body.as_deref().unwrap_or_default()
        };

        Ok(keyphrase::extract_enriched(basis, self.config.max_phrases, self.embedder.as_ref())
            .await)
    }

    /// Score all candidates and build the final report. Zero candidates is
    /// a valid outcome (very-low, empty sources), not an error.
    pub async fn build_report(
        &self,
        input: &InputDocument,
        candidates: &[CandidateArticle],
    ) -> Result<CredibilityReport, TruthScopeError> {
        let keywords = self.extract_keywords(input).await?;
        self.build_report_with_keywords(input, keywords, candidates)
            .await
    }

    /// Same as [`build_report`](Self::build_report) but reuses key phrases
    /// the caller already extracted, e.g. to form the search query.
    pub async fn build_report_with_keywords(
        &self,
        input: &InputDocument,
        keywords: KeyPhraseSet,
        candidates: &[CandidateArticle],
    ) -> Result<CredibilityReport, TruthScopeError> {
        if !input.has_text() {
            return Err(TruthScopeError::EmptyInput);
        }
        let comparison = input.comparison_text();

        // Dedup by normalized URL, first occurrence wins.
        let mut seen: HashSet<String> = HashSet::new();
        let deduped: Vec<&CandidateArticle> = candidates
            .iter()
            .filter(|c| seen.insert(normalize_url(&c.url)))
            .collect();

        info!(
            candidates = deduped.len(),
            duplicates = candidates.len() - deduped.len(),
            "Scoring candidate articles"
        );

        // Per-candidate scoring is independent; fan out with a bounded
        // pool and defer aggregation until every result is in. The
        // collection index restores a deterministic order afterwards.
        let mut scored: Vec<(usize, WeightedSource)> =
            stream::iter(deduped.iter().enumerate().map(|(index, article)| {
                let comparison = comparison.as_str();
                async move {
                    let candidate_text = candidate_text(*article);
                    let similarity = self.scorer.score(comparison, &candidate_text).await;
                    let source_weight = self.weights.weight_for(&article.url);
                    let weighted_score = similarity.raw_similarity * source_weight;
                    (
                        index,
                        WeightedSource {
                            article: (*article).clone(),
                            similarity,
                            source_weight,
                            weighted_score,
                        },
                    )
                }
            }))
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        scored.sort_by_key(|(index, _)| *index);

        let total_score: f64 = scored.iter().map(|(_, s)| s.weighted_score).sum();
        let level = self.config.thresholds.classify(total_score);

        // Presentation order: weighted score descending; equal scores keep
        // collection order (stable sort over the index-ordered vec).
        let mut sources: Vec<WeightedSource> = scored.into_iter().map(|(_, s)| s).collect();
        sources.sort_by(|a, b| {
            b.weighted_score
                .partial_cmp(&a.weighted_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut weights_used: BTreeMap<String, f64> = BTreeMap::new();
        for source in &sources {
            weights_used
                .entry(domain_of(&source.article.url))
                .or_insert(source.source_weight);
        }

        info!(
            total_score,
            level = %level,
            sources_analyzed = sources.len(),
            "Credibility report built"
        );

        Ok(CredibilityReport {
            input: InputSummary {
                text: input.text.clone(),
                kind: input.kind,
            },
            credibility: CredibilitySummary {
                headline: input.headline.clone(),
                keywords: keywords.to_vec(),
                total_score: round3(total_score),
                credibility_level: level,
                interpretation: level.interpretation().to_string(),
                sources_analyzed: sources.len(),
            },
            sources: sources
                .into_iter()
                .map(|s| SourceScore {
                    url: s.article.url,
                    title: s.article.title,
                    raw_similarity: round3(s.similarity.raw_similarity),
                    source_weight: s.source_weight,
                    weighted_score: round3(s.weighted_score),
                    similarity_method: s.similarity.method,
                })
                .collect(),
            weights_used,
        })
    }
}

/// Text a candidate is compared with: title plus whatever body or snippet
/// the collector supplied.
fn candidate_text(article: &CandidateArticle) -> String {
    if article.snippet_or_body.trim().is_empty() {
        article.title.clone()
    } else if article.title.trim().is_empty() {
        article.snippet_or_body.clone()
    } else {
        format!("{}\n\n{}", article.title, article.snippet_or_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries_are_closed_on_the_lower_bound() {
        let t = CredibilityThresholds::default();
        assert_eq!(t.classify(12.0), CredibilityLevel::High);
        assert_eq!(t.classify(11.999), CredibilityLevel::Moderate);
        assert_eq!(t.classify(8.0), CredibilityLevel::Moderate);
        assert_eq!(t.classify(7.999), CredibilityLevel::Fair);
        assert_eq!(t.classify(5.0), CredibilityLevel::Fair);
        assert_eq!(t.classify(2.0), CredibilityLevel::Low);
        assert_eq!(t.classify(1.999), CredibilityLevel::VeryLow);
        assert_eq!(t.classify(0.0), CredibilityLevel::VeryLow);
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let t = CredibilityThresholds {
            high: 4.0,
            moderate: 3.0,
            fair: 2.0,
            low: 1.0,
        };
        assert_eq!(t.classify(4.0), CredibilityLevel::High);
        assert_eq!(t.classify(0.5), CredibilityLevel::VeryLow);
    }

    #[test]
    fn candidate_text_joins_title_and_snippet() {
        let article = CandidateArticle {
            url: "https://example.com".into(),
            title: "Title".into(),
            snippet_or_body: "Snippet".into(),
        };
        assert_eq!(candidate_text(&article), "Title\n\nSnippet");

        let title_only = CandidateArticle {
            snippet_or_body: "  ".into(),
            ..article.clone()
        };
        assert_eq!(candidate_text(&title_only), "Title");
    }
}
