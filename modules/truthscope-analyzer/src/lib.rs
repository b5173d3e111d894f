pub mod analyzer;
pub mod collect;
pub mod embedder;
pub mod scraper;
pub mod searcher;

pub use analyzer::Analyzer;
