//! Candidate collection: search the web for the claim's key phrases, then
//! fetch article text for each hit. Scrape failures degrade to the search
//! snippet; hits with no text at all are dropped.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use truthscope_common::{normalize_url, CandidateArticle};

use crate::scraper::PageScraper;
use crate::searcher::{SearchResult, WebSearcher};

pub struct CandidateCollector {
    searcher: Arc<dyn WebSearcher>,
    scraper: Option<Arc<dyn PageScraper>>,
    max_results: usize,
    concurrency: usize,
}

impl CandidateCollector {
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        scraper: Option<Arc<dyn PageScraper>>,
        max_results: usize,
    ) -> Self {
        Self {
            searcher,
            scraper,
            max_results,
            concurrency: 4,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Search for the query and materialize candidate articles. The
    /// optional URL is the input article itself and is excluded from the
    /// results so an article never corroborates itself.
    ///
    /// Search quota or network failure yields an empty candidate set, not
    /// a pipeline abort; the run then produces a very-low report.
    pub async fn collect(&self, query: &str, exclude_url: Option<&str>) -> Vec<CandidateArticle> {
        let hits = match self.searcher.search(query, self.max_results).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query, error = %e, "Search failed, continuing with no candidates");
                return Vec::new();
            }
        };

        let excluded = exclude_url.map(normalize_url);
        let mut seen: HashSet<String> = HashSet::new();
        let hits: Vec<SearchResult> = hits
            .into_iter()
            .filter(|hit| {
                let normalized = normalize_url(&hit.url);
                if excluded.as_deref() == Some(normalized.as_str()) {
                    return false;
                }
                seen.insert(normalized)
            })
            .collect();

        info!(query, hits = hits.len(), "Collecting candidate articles");

        // Fetch in parallel, then restore search-rank order; downstream
        // tie-breaking depends on it.
        let mut fetched: Vec<(usize, Option<CandidateArticle>)> = stream::iter(
            hits.into_iter()
                .enumerate()
                .map(|(index, hit)| async move { (index, self.materialize(hit).await) }),
        )
        .buffer_unordered(self.concurrency)
        .collect()
        .await;
        fetched.sort_by_key(|(index, _)| *index);

        let candidates: Vec<CandidateArticle> =
            fetched.into_iter().filter_map(|(_, c)| c).collect();

        info!(query, candidates = candidates.len(), "Candidate collection complete");
        candidates
    }

    async fn materialize(&self, hit: SearchResult) -> Option<CandidateArticle> {
        let body = match &self.scraper {
            Some(scraper) => match scraper.scrape(&hit.url).await {
                Ok(page) if !page.body.trim().is_empty() => page.body,
                Ok(_) => {
                    warn!(url = %hit.url, "Scrape returned no content, using snippet");
                    hit.snippet.clone()
                }
                Err(e) => {
                    warn!(url = %hit.url, error = %e, "Scrape failed, using snippet");
                    hit.snippet.clone()
                }
            },
            None => hit.snippet.clone(),
        };

        if hit.title.trim().is_empty() && body.trim().is_empty() {
            warn!(url = %hit.url, "Dropping hit with no usable text");
            return None;
        }

        Some(CandidateArticle {
            url: hit.url,
            title: hit.title,
            snippet_or_body: body,
        })
    }
}
