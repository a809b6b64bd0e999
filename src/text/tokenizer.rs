//! Normalization: the one pure function `raw_text -> term sequence`.

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::OnceLock;

use super::StopWords;

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+").expect("static pattern"))
}

/// Normalizes raw text into an ordered sequence of index/query terms.
///
/// Implementations must be deterministic: identical input yields a
/// bit-identical output sequence (order and multiplicity) on every run.
/// `Sync` so the builder can normalize a batch of documents across
/// rayon's thread pool before accumulating them.
pub trait Normalizer: Sync {
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// The reference normalization pipeline: lowercase, tokenize on runs of
/// word characters, keep ASCII-alphabetic tokens, drop stop words, and
/// optionally apply the Snowball English stemmer.
pub struct StandardNormalizer {
    stopwords: StopWords,
    stem: bool,
    stemmer: Option<Stemmer>,
}

impl StandardNormalizer {
    pub fn new(stopwords: StopWords, stem: bool) -> Self {
        let stemmer = stem.then(|| Stemmer::create(Algorithm::English));
        Self {
            stopwords,
            stem,
            stemmer,
        }
    }
}

impl Normalizer for StandardNormalizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut terms = Vec::new();
        for token in word_pattern().find_iter(&lowered) {
            let token = token.as_str();
            if !token.chars().all(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            if self.stopwords.contains(token) {
                continue;
            }
            if self.stem {
                let stemmed = self
                    .stemmer
                    .as_ref()
                    .expect("stemmer present when stem=true")
                    .stem(token);
                terms.push(stemmed.into_owned());
            } else {
                terms.push(token.to_string());
            }
        }
        terms
    }
}
