use thiserror::Error;

#[derive(Error, Debug)]
pub enum TruthScopeError {
    /// The input document has no extractable text at all. This is the only
    /// fatal condition of a run and must never be conflated with a
    /// low-credibility verdict.
    #[error("Input has no extractable text")]
    EmptyInput,

    #[error("Search error: {0}")]
    Search(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
