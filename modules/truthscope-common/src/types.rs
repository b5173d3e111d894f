use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// --- Input ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Headline,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Url => write!(f, "url"),
            InputKind::Headline => write!(f, "headline"),
        }
    }
}

/// The article or headline under analysis. Immutable once constructed;
/// URL inputs have their headline and body materialized by the scraper
/// before the document is built.
#[derive(Debug, Clone)]
pub struct InputDocument {
    /// Raw input as given (URL or headline text).
    pub text: String,
    pub kind: InputKind,
    pub headline: String,
    pub body: Option<String>,
}

impl InputDocument {
    pub fn from_headline(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            headline: text.clone(),
            text,
            kind: InputKind::Headline,
            body: None,
        }
    }

    pub fn from_url(
        url: impl Into<String>,
        headline: impl Into<String>,
        body: Option<String>,
    ) -> Self {
        Self {
            text: url.into(),
            kind: InputKind::Url,
            headline: headline.into(),
            body,
        }
    }

    /// Headline and body concatenated; the text candidates are compared against.
    pub fn comparison_text(&self) -> String {
        match self.body.as_deref() {
            Some(body) if !body.trim().is_empty() => {
                format!("{}\n\n{}", self.headline, body)
            }
            _ => self.headline.clone(),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.headline.trim().is_empty()
            || self.body.as_deref().is_some_and(|b| !b.trim().is_empty())
    }
}

// --- Candidates and scoring ---

/// One search result, as supplied by the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateArticle {
    pub url: String,
    pub title: String,
    pub snippet_or_body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMethod {
    Semantic,
    Jaccard,
    Overlap,
}

impl std::fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilarityMethod::Semantic => write!(f, "semantic"),
            SimilarityMethod::Jaccard => write!(f, "jaccard"),
            SimilarityMethod::Overlap => write!(f, "overlap"),
        }
    }
}

/// Outcome of one similarity computation. The method actually used is
/// always recorded so tier degradation is auditable downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// In [0, 1].
    pub raw_similarity: f64,
    pub method: SimilarityMethod,
}

/// A candidate article with its similarity and source-trust weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSource {
    pub article: CandidateArticle,
    pub similarity: SimilarityResult,
    pub source_weight: f64,
    /// raw_similarity * source_weight
    pub weighted_score: f64,
}

// --- Credibility verdict ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredibilityLevel {
    High,
    Moderate,
    Fair,
    Low,
    VeryLow,
}

impl CredibilityLevel {
    pub fn interpretation(&self) -> &'static str {
        match self {
            CredibilityLevel::High => {
                "High credibility - Information is well-supported by reliable sources"
            }
            CredibilityLevel::Moderate => {
                "Moderate credibility - Information has good support from credible sources"
            }
            CredibilityLevel::Fair => "Fair credibility - Some support from reliable sources",
            CredibilityLevel::Low => "Low credibility - Limited support from reliable sources",
            CredibilityLevel::VeryLow => {
                "Very low credibility - Minimal or no support from reliable sources"
            }
        }
    }
}

impl std::fmt::Display for CredibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredibilityLevel::High => write!(f, "high"),
            CredibilityLevel::Moderate => write!(f, "moderate"),
            CredibilityLevel::Fair => write!(f, "fair"),
            CredibilityLevel::Low => write!(f, "low"),
            CredibilityLevel::VeryLow => write!(f, "very-low"),
        }
    }
}

// --- Report (fixed JSON shape) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilitySummary {
    pub headline: String,
    pub keywords: Vec<String>,
    pub total_score: f64,
    pub credibility_level: CredibilityLevel,
    pub interpretation: String,
    pub sources_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceScore {
    pub url: String,
    pub title: String,
    pub raw_similarity: f64,
    pub source_weight: f64,
    pub weighted_score: f64,
    pub similarity_method: SimilarityMethod,
}

/// The sole externally persisted artifact of a run. Immutable once
/// produced; refreshing it requires a complete re-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityReport {
    pub input: InputSummary,
    pub credibility: CredibilitySummary,
    pub sources: Vec<SourceScore>,
    pub weights_used: BTreeMap<String, f64>,
}

// --- Helpers ---

/// Round to 3 decimals for report presentation. Internal math stays unrounded.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Normalize a URL for deduplication: lowercase host, strip `www.`, drop
/// fragment and trailing slash. Unparseable URLs fall back to trimmed input.
pub fn normalize_url(raw: &str) -> String {
    match url::Url::parse(raw.trim()) {
        Ok(mut u) => {
            u.set_fragment(None);
            let host = u.host_str().unwrap_or("").to_lowercase();
            let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
            let path = u.path().trim_end_matches('/');
            let query = u
                .query()
                .map(|q| format!("?{q}"))
                .unwrap_or_default();
            format!("{}://{}{}{}", u.scheme(), host, path, query)
        }
        Err(_) => raw.trim().to_string(),
    }
}

/// Extract the host of a URL, lowercased and without the `www.` prefix.
pub fn domain_of(url: &str) -> String {
    let host = url
        .split("://")
        .nth(1)
        .unwrap_or(url)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&InputKind::Url).unwrap(), "\"url\"");
        assert_eq!(
            serde_json::to_string(&InputKind::Headline).unwrap(),
            "\"headline\""
        );
    }

    #[test]
    fn credibility_level_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&CredibilityLevel::VeryLow).unwrap(),
            "\"very-low\""
        );
        assert_eq!(
            serde_json::to_string(&CredibilityLevel::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn similarity_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SimilarityMethod::Jaccard).unwrap(),
            "\"jaccard\""
        );
    }

    #[test]
    fn normalize_url_strips_www_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://WWW.Example.com/news/story/#section"),
            "https://example.com/news/story"
        );
        assert_eq!(
            normalize_url("https://example.com/news/story/"),
            normalize_url("https://www.example.com/news/story")
        );
    }

    #[test]
    fn domain_of_handles_ports_and_paths() {
        assert_eq!(domain_of("https://www.bbc.com/news/article"), "bbc.com");
        assert_eq!(domain_of("http://example.com:8080/x"), "example.com");
        assert_eq!(domain_of("cdc.gov/flu"), "cdc.gov");
    }

    #[test]
    fn comparison_text_prefers_headline_plus_body() {
        let doc = InputDocument::from_url(
            "https://example.com/a",
            "Flu cases rising",
            Some("Hospitals report record admissions.".to_string()),
        );
        assert_eq!(
            doc.comparison_text(),
            "Flu cases rising\n\nHospitals report record admissions."
        );

        let headline_only = InputDocument::from_headline("Flu cases rising");
        assert_eq!(headline_only.comparison_text(), "Flu cases rising");
    }

    #[test]
    fn has_text_rejects_blank_documents() {
        let blank = InputDocument::from_url("https://example.com", "  ", Some("   ".into()));
        assert!(!blank.has_text());
        assert!(InputDocument::from_headline("x").has_text());
    }
}
