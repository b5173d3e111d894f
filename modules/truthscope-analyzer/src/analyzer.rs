//! End-to-end analysis: resolve the input, extract key phrases, gather
//! corroborating articles, score and classify.

use std::sync::Arc;

use tracing::info;

use truthscope_common::{Config, CredibilityReport, InputDocument, TruthScopeError};
use truthscope_engine::{Aggregator, ScoringConfig, SourceWeights, TextEmbedder};

use crate::collect::CandidateCollector;
use crate::embedder::EmbeddingClient;
use crate::scraper::{HttpScraper, PageScraper};
use crate::searcher::{GoogleSearcher, WebSearcher};

pub struct Analyzer {
    aggregator: Aggregator,
    collector: CandidateCollector,
    scraper: Arc<dyn PageScraper>,
}

impl Analyzer {
    /// Wire up the production collaborators from environment configuration.
    pub fn from_config(config: &Config) -> Self {
        let embedder: Option<Arc<dyn TextEmbedder>> = config.embedding_api_key.as_ref().map(|key| {
            Arc::new(
                EmbeddingClient::new(key, &config.embedding_model)
                    .with_base_url(config.embedding_base_url.clone()),
            ) as Arc<dyn TextEmbedder>
        });

        let searcher: Arc<dyn WebSearcher> =
            Arc::new(GoogleSearcher::new(&config.search_api_key, &config.search_engine_id));
        let scraper: Arc<dyn PageScraper> = Arc::new(HttpScraper::new());

        Self::new(config, searcher, scraper, embedder)
    }

    /// Collaborators injected; used directly by tests.
    pub fn new(
        config: &Config,
        searcher: Arc<dyn WebSearcher>,
        scraper: Arc<dyn PageScraper>,
        embedder: Option<Arc<dyn TextEmbedder>>,
    ) -> Self {
        let scoring = ScoringConfig {
            max_phrases: config.max_keyphrases,
            semantic_enabled: config.semantic_enabled(),
            ..ScoringConfig::default()
        };
        let aggregator = Aggregator::new(scoring, SourceWeights::default(), embedder);
        let collector = CandidateCollector::new(
            searcher,
            Some(scraper.clone()),
            config.max_search_results,
        );

        Self {
            aggregator,
            collector,
            scraper,
        }
    }

    /// Analyze a raw input string, either a URL or a headline.
    pub async fn analyze(&self, raw_input: &str) -> Result<CredibilityReport, TruthScopeError> {
        let raw_input = raw_input.trim();
        if raw_input.is_empty() {
            return Err(TruthScopeError::EmptyInput);
        }

        let input = self.resolve_input(raw_input).await?;
        info!(kind = %input.kind, headline = %input.headline, "Input resolved");

        let keywords = self.aggregator.extract_keywords(&input).await?;
        let query = keywords.join();
        info!(query, "Search query built from key phrases");

        let exclude = match input.kind {
            truthscope_common::InputKind::Url => Some(input.text.as_str()),
            truthscope_common::InputKind::Headline => None,
        };
        let candidates = self.collector.collect(&query, exclude).await;

        self.aggregator
            .build_report_with_keywords(&input, keywords, &candidates)
            .await
    }

    /// URL inputs are scraped up front so the headline and body are fixed
    /// for the rest of the run; anything else is treated as a headline.
    async fn resolve_input(&self, raw: &str) -> Result<InputDocument, TruthScopeError> {
        if !is_valid_url(raw) {
            return Ok(InputDocument::from_headline(raw));
        }

        let page = self
            .scraper
            .scrape(raw)
            .await
            .map_err(|e| TruthScopeError::Scraping(e.to_string()))?;

        let body = if page.body.trim().is_empty() {
            None
        } else {
            Some(page.body)
        };
        Ok(InputDocument::from_url(raw, page.headline, body))
    }
}

/// A string is a URL input only when it parses with an http(s) scheme and
/// a host. Bare headlines containing dots stay headlines.
pub fn is_valid_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}
