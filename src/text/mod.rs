//! Text normalization: raw document/query text to an ordered term sequence.

mod stopwords;
mod tokenizer;

pub use stopwords::StopWords;
pub use tokenizer::{Normalizer, StandardNormalizer};
