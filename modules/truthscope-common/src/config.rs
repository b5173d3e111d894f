use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Search collector (Google Custom Search)
    pub search_api_key: String,
    pub search_engine_id: String,

    // Embedding provider (OpenAI-compatible API, optional)
    pub embedding_api_key: Option<String>,
    pub embedding_base_url: String,
    pub embedding_model: String,

    // Scoring knobs
    pub max_keyphrases: usize,
    pub max_search_results: usize,
    pub semantic_similarity: bool,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            search_api_key: required_env("SEARCH_API_KEY"),
            search_engine_id: required_env("SEARCH_ENGINE_ID"),
            embedding_api_key: env::var("EMBEDDING_API_KEY").ok().filter(|k| !k.is_empty()),
            embedding_base_url: env::var("EMBEDDING_BASE_URL")
                .unwrap_or_else(|_| "https://api.voyageai.com/v1".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "voyage-3-large".to_string()),
            max_keyphrases: env::var("MAX_KEYPHRASES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("MAX_KEYPHRASES must be a number"),
            max_search_results: env::var("MAX_SEARCH_RESULTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("MAX_SEARCH_RESULTS must be a number"),
            semantic_similarity: env::var("SEMANTIC_SIMILARITY")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Semantic similarity runs only when the tier is enabled and an
    /// embedding key is configured. Either switch forces the lexical tiers.
    pub fn semantic_enabled(&self) -> bool {
        self.semantic_similarity && self.embedding_api_key.is_some()
    }

    /// Log the active configuration without leaking secrets.
    pub fn log_redacted(&self) {
        info!(
            search_engine_id = self.search_engine_id.as_str(),
            embedding_model = self.embedding_model.as_str(),
            embedding_key_set = self.embedding_api_key.is_some(),
            max_keyphrases = self.max_keyphrases,
            max_search_results = self.max_search_results,
            semantic = self.semantic_enabled(),
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
