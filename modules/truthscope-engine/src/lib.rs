pub mod aggregate;
pub mod keyphrase;
pub mod similarity;
pub mod text;
pub mod weights;

pub use aggregate::{Aggregator, CredibilityThresholds, ScoringConfig};
pub use keyphrase::KeyPhraseSet;
pub use similarity::{cosine_similarity, SimilarityScorer, TextEmbedder};
pub use weights::SourceWeights;
