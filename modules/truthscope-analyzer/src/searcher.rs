use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

// --- WebSearcher trait ---

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

// --- Google Custom Search ---

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
/// API constraint: at most 10 results per page.
const RESULTS_PER_PAGE: usize = 10;

pub struct GoogleSearcher {
    api_key: String,
    engine_id: String,
    client: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
    error: Option<GoogleApiError>,
}

#[derive(Debug, serde::Deserialize)]
struct GoogleItem {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, serde::Deserialize)]
struct GoogleApiError {
    #[serde(default)]
    message: String,
}

impl GoogleSearcher {
    pub fn new(api_key: &str, engine_id: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn fetch_page(&self, query: &str, num: usize, start: usize) -> Result<Vec<GoogleItem>> {
        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", &num.to_string()),
                ("start", &start.to_string()),
            ])
            .send()
            .await
            .context("Search API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Search API error ({status}): {body}");
        }

        let data: GoogleResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        if let Some(error) = data.error {
            anyhow::bail!("Search API error: {}", error.message);
        }

        Ok(data.items)
    }
}

#[async_trait]
impl WebSearcher for GoogleSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        info!(query, max_results, "Google search");

        let mut results: Vec<SearchResult> = Vec::new();
        let mut start = 1;

        // Paginate; the API serves at most 10 items per request.
        while results.len() < max_results {
            let num = (max_results - results.len()).min(RESULTS_PER_PAGE);
            let items = self.fetch_page(query, num, start).await?;
            if items.is_empty() {
                break;
            }

            start += items.len();
            results.extend(items.into_iter().filter(is_valid_item).map(|item| {
                SearchResult {
                    url: item.link,
                    title: item.title,
                    snippet: item.snippet,
                }
            }));
        }

        results.truncate(max_results);
        info!(query, count = results.len(), "Google search complete");
        Ok(results)
    }
}

fn is_valid_item(item: &GoogleItem) -> bool {
    match url::Url::parse(&item.link) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}
