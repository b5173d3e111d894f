use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::{info, warn};

/// Head and body text of a fetched page.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub headline: String,
    pub body: String,
}

// --- PageScraper trait ---

#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;
    fn name(&self) -> &str;
}

// --- HTTP + Readability scraper ---

static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+property\s*=\s*["']og:title["'][^>]+content\s*=\s*["']([^"']+)["']"#)
        .expect("valid regex")
});
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Fetches a page over plain HTTP and extracts the headline from document
/// metadata plus the main content via Readability.
pub struct HttpScraper {
    client: reqwest::Client,
}

impl Default for HttpScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .user_agent("Mozilla/5.0 (compatible; TruthScope/0.1)")
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl PageScraper for HttpScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        info!(url, scraper = "http", "Scraping URL");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Page request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Page request returned {}", response.status());
        }

        let html = response.text().await.context("Failed to read page body")?;
        if html.trim().is_empty() {
            warn!(url, scraper = "http", "Empty HTML response");
            return Ok(ScrapedPage {
                headline: String::new(),
                body: String::new(),
            });
        }

        let headline = extract_headline(&html);

        let config = TransformConfig {
            readability: true,
            main_content: true,
            return_format: ReturnFormat::Markdown,
            filter_images: true,
            filter_svg: true,
            clean_html: true,
        };
        let input = TransformInput {
            url: Some(&parsed),
            content: html.as_bytes(),
            screenshot_bytes: None,
            encoding: None,
            selector_config: None,
            ignore_tags: None,
        };

        let body = transform_content_input(input, &config);

        if body.trim().is_empty() {
            warn!(url, scraper = "http", "Empty content after Readability extraction");
        } else {
            info!(url, scraper = "http", bytes = body.len(), "Scraped successfully");
        }

        Ok(ScrapedPage {
            headline,
            body: body.trim().to_string(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Headline from page metadata: og:title, then <title>, then the first <h1>.
fn extract_headline(html: &str) -> String {
    for re in [&*OG_TITLE_RE, &*TITLE_RE, &*H1_RE] {
        if let Some(cap) = re.captures(html) {
            let text = TAG_RE.replace_all(&cap[1], " ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}
