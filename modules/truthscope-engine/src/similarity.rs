//! Tiered similarity scoring: semantic embeddings when available, lexical
//! set metrics otherwise. Scoring never fails — a weaker tier always
//! produces a value, and the tier used is recorded in the result.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use truthscope_common::{SimilarityMethod, SimilarityResult};

use crate::text::word_set;

// --- TextEmbedder trait ---

/// Seam for the sentence-embedding provider. The handle is created once
/// per process and shared read-only; implementations must be safe for
/// concurrent use.
#[async_trait::async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}

/// How long a single embedding call may take before the scorer falls
/// through to the lexical tiers.
const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(20);

// --- Scorer ---

pub struct SimilarityScorer {
    embedder: Option<Arc<dyn TextEmbedder>>,
    semantic_enabled: bool,
    embed_timeout: Duration,
}

impl SimilarityScorer {
    pub fn new(embedder: Option<Arc<dyn TextEmbedder>>, semantic_enabled: bool) -> Self {
        Self {
            embedder,
            semantic_enabled,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }

    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    /// Score two texts in [0, 1]. Tier order is fixed: semantic, then
    /// Jaccard, then overlap coefficient for degenerate word sets.
    pub async fn score(&self, a: &str, b: &str) -> SimilarityResult {
        if self.semantic_enabled && !a.trim().is_empty() && !b.trim().is_empty() {
            if let Some(embedder) = &self.embedder {
                match self.semantic(embedder.as_ref(), a, b).await {
                    Ok(raw_similarity) => {
                        return SimilarityResult {
                            raw_similarity,
                            method: SimilarityMethod::Semantic,
                        };
                    }
                    Err(e) => {
                        warn!(error = %e, "Semantic similarity unavailable, falling back to lexical tier");
                    }
                }
            }
        }

        let set_a = word_set(a);
        let set_b = word_set(b);

        // Jaccard needs real sets on both sides; single-token or empty
        // inputs go to the overlap coefficient instead.
        if set_a.len() > 1 && set_b.len() > 1 {
            SimilarityResult {
                raw_similarity: jaccard_similarity(&set_a, &set_b),
                method: SimilarityMethod::Jaccard,
            }
        } else {
            SimilarityResult {
                raw_similarity: overlap_coefficient(&set_a, &set_b),
                method: SimilarityMethod::Overlap,
            }
        }
    }

    async fn semantic(&self, embedder: &dyn TextEmbedder, a: &str, b: &str) -> Result<f64> {
        let vectors = tokio::time::timeout(
            self.embed_timeout,
            embedder.embed_batch(vec![a.to_string(), b.to_string()]),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!("embedding timed out after {}s", self.embed_timeout.as_secs())
        })??;

        let [va, vb] = vectors.as_slice() else {
            anyhow::bail!("expected 2 embeddings, got {}", vectors.len());
        };
        if va.is_empty() || vb.is_empty() || va.len() != vb.len() {
            anyhow::bail!("embedding dimensions invalid ({} vs {})", va.len(), vb.len());
        }

        Ok(cosine_similarity(va, vb).clamp(0.0, 1.0))
    }
}

// --- Metrics ---

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// |intersection| / |union|, 0 when the union is empty.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// |intersection| / min(|a|, |b|), 0 when either set is empty.
pub fn overlap_coefficient(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / smaller as f64
}
