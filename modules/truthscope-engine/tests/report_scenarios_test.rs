//! End-to-end scoring scenarios over the aggregator: pure engine, no
//! network, embedding behavior simulated through stub embedders.

use std::sync::Arc;

use anyhow::Result;

use truthscope_common::{
    CandidateArticle, CredibilityLevel, CredibilityReport, InputDocument, SimilarityMethod,
};
use truthscope_engine::{Aggregator, ScoringConfig, SourceWeights, TextEmbedder};

const HEADLINE: &str = "Local hospital reports record flu cases";

fn candidate(url: &str, title: &str, snippet: &str) -> CandidateArticle {
    CandidateArticle {
        url: url.to_string(),
        title: title.to_string(),
        snippet_or_body: snippet.to_string(),
    }
}

fn lexical_aggregator() -> Aggregator {
    let config = ScoringConfig {
        semantic_enabled: false,
        ..ScoringConfig::default()
    };
    Aggregator::new(config, SourceWeights::default(), None)
}

/// Embeds the anchor text to a fixed axis and everything else to a vector
/// at a known angle, so the cosine between anchor and candidate is exact.
struct AngleEmbedder {
    anchor: String,
    cosine: f32,
}

#[async_trait::async_trait]
impl TextEmbedder for AngleEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.starts_with(&self.anchor) {
            Ok(vec![1.0, 0.0])
        } else {
            Ok(vec![self.cosine, (1.0 - self.cosine * self.cosine).sqrt()])
        }
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for t in &texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }
}

fn semantic_aggregator(cosine: f32) -> Aggregator {
    let embedder: Arc<dyn TextEmbedder> = Arc::new(AngleEmbedder {
        anchor: HEADLINE.to_string(),
        cosine,
    });
    Aggregator::new(
        ScoringConfig::default(),
        SourceWeights::default(),
        Some(embedder),
    )
}

#[tokio::test]
async fn zero_candidates_yield_valid_very_low_report() {
    let aggregator = lexical_aggregator();
    let input = InputDocument::from_headline(HEADLINE);

    let report = aggregator.build_report(&input, &[]).await.unwrap();

    assert_eq!(report.credibility.total_score, 0.0);
    assert_eq!(report.credibility.credibility_level, CredibilityLevel::VeryLow);
    assert_eq!(report.credibility.sources_analyzed, 0);
    assert!(report.sources.is_empty());
    assert!(report.weights_used.is_empty());
    assert!(!report.credibility.keywords.is_empty());
}

#[tokio::test]
async fn cdc_candidate_at_similarity_08_scores_fair() {
    let aggregator = semantic_aggregator(0.8);
    let input = InputDocument::from_headline(HEADLINE);
    let candidates = [candidate(
        "https://www.cdc.gov/flu/weekly-report",
        "Weekly US Influenza Surveillance Report",
        "Influenza activity is elevated nationwide.",
    )];

    let report = aggregator.build_report(&input, &candidates).await.unwrap();

    assert_eq!(report.sources.len(), 1);
    let source = &report.sources[0];
    assert_eq!(source.similarity_method, SimilarityMethod::Semantic);
    assert!((source.raw_similarity - 0.8).abs() < 1e-6);
    assert_eq!(source.source_weight, 9.0);
    assert!((source.weighted_score - 7.2).abs() < 1e-6);
    assert!((report.credibility.total_score - 7.2).abs() < 1e-6);
    assert_eq!(report.credibility.credibility_level, CredibilityLevel::Fair);
    assert_eq!(report.weights_used.get("cdc.gov"), Some(&9.0));
}

#[tokio::test]
async fn empty_input_is_fatal_and_distinct_from_low_credibility() {
    let aggregator = lexical_aggregator();
    let input = InputDocument::from_url("https://example.com/x", "  ", Some("  ".into()));

    let err = aggregator.build_report(&input, &[]).await.unwrap_err();
    assert!(matches!(err, truthscope_common::TruthScopeError::EmptyInput));
}

#[tokio::test]
async fn semantic_disabled_never_reports_semantic_method() {
    let aggregator = lexical_aggregator();
    let input = InputDocument::from_headline(HEADLINE);
    let candidates = [
        candidate(
            "https://www.bbc.com/news/flu-1",
            "Hospital flu admissions hit record",
            "Record flu cases reported by the local hospital this week.",
        ),
        candidate(
            "https://example-news.com/flu",
            "Flu",
            "",
        ),
        candidate(
            "https://www.reuters.com/health/flu-2",
            "Flu season intensifies",
            "Hospitals report rising case counts.",
        ),
    ];

    let report = aggregator.build_report(&input, &candidates).await.unwrap();

    assert_eq!(report.sources.len(), 3);
    for source in &report.sources {
        assert_ne!(source.similarity_method, SimilarityMethod::Semantic);
    }
}

#[tokio::test]
async fn candidates_are_deduplicated_by_normalized_url() {
    let aggregator = lexical_aggregator();
    let input = InputDocument::from_headline(HEADLINE);
    let candidates = [
        candidate(
            "https://www.bbc.com/news/flu-1",
            "Hospital flu admissions hit record",
            "Record flu cases reported.",
        ),
        candidate(
            "https://bbc.com/news/flu-1/",
            "Hospital flu admissions hit record",
            "Record flu cases reported.",
        ),
    ];

    let report = aggregator.build_report(&input, &candidates).await.unwrap();
    assert_eq!(report.credibility.sources_analyzed, 1);
}

#[tokio::test]
async fn sources_sort_by_weighted_score_with_stable_tie_break() {
    let aggregator = semantic_aggregator(0.5);
    let input = InputDocument::from_headline(HEADLINE);
    // Same similarity everywhere; bbc (5.0) must outrank the two unknown
    // domains (1.0 each), which keep their collection order.
    let candidates = [
        candidate("https://first-unknown.com/a", "Flu report A", "flu"),
        candidate("https://www.bbc.com/news/flu", "Flu report B", "flu"),
        candidate("https://second-unknown.com/c", "Flu report C", "flu"),
    ];

    let report = aggregator.build_report(&input, &candidates).await.unwrap();

    assert_eq!(report.sources[0].url, "https://www.bbc.com/news/flu");
    assert_eq!(report.sources[1].url, "https://first-unknown.com/a");
    assert_eq!(report.sources[2].url, "https://second-unknown.com/c");
}

#[tokio::test]
async fn total_score_is_monotone_in_similarity_and_weight() {
    let input = InputDocument::from_headline(HEADLINE);
    let candidates = [candidate("https://example-news.com/a", "Flu report", "flu")];

    let low_sim = semantic_aggregator(0.3)
        .build_report(&input, &candidates)
        .await
        .unwrap();
    let high_sim = semantic_aggregator(0.9)
        .build_report(&input, &candidates)
        .await
        .unwrap();
    assert!(high_sim.credibility.total_score > low_sim.credibility.total_score);

    let heavier = Aggregator::new(
        ScoringConfig::default(),
        SourceWeights::new([("example-news.com".to_string(), 6.0)], 1.0),
        Some(Arc::new(AngleEmbedder {
            anchor: HEADLINE.to_string(),
            cosine: 0.3,
        })),
    )
    .build_report(&input, &candidates)
    .await
    .unwrap();
    assert!(heavier.credibility.total_score > low_sim.credibility.total_score);
}

#[tokio::test]
async fn report_round_trips_through_fixed_json_shape() {
    let aggregator = semantic_aggregator(0.8);
    let input = InputDocument::from_headline(HEADLINE);
    let candidates = [
        candidate(
            "https://www.cdc.gov/flu/weekly-report",
            "Weekly US Influenza Surveillance Report",
            "Influenza activity is elevated.",
        ),
        candidate(
            "https://example-news.com/flu",
            "Flu cases up",
            "Cases are up.",
        ),
    ];

    let report = aggregator.build_report(&input, &candidates).await.unwrap();

    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: CredibilityReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, back);

    // Field names and enum spellings of the fixed shape. Total is
    // 0.8 * 9.0 + 0.8 * 1.0 = 8.0, exactly on the moderate boundary.
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["input"]["type"], "headline");
    assert_eq!(value["credibility"]["credibility_level"], "moderate");
    assert_eq!(value["sources"][0]["similarity_method"], "semantic");
    assert!(value["weights_used"]["cdc.gov"].is_number());
    assert!(value["credibility"]["sources_analyzed"].is_number());
}
