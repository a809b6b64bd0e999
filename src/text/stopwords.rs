//! Stop-word set loading.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, SpindexError};

/// Punctuation tokens dropped regardless of which stop-word list is loaded.
const FIXED_PUNCTUATION: &[&str] = &["?", "-", ".", ":", ",", "!", ";", "_"];

/// A case-folded stop-word set consulted by [`StandardNormalizer`](super::StandardNormalizer).
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The fixed punctuation set alone, no language-specific words.
    pub fn empty() -> Self {
        let words = FIXED_PUNCTUATION.iter().map(|s| s.to_string()).collect();
        Self { words }
    }

    /// Loads a newline-delimited stop-word file, one word per line, trailing
    /// whitespace stripped and case-folded to lowercase, augmented with the
    /// fixed punctuation set.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SpindexError::InvalidCorpus(format!(
                "cannot read stop-word file {}: {e}",
                path.display()
            ))
        })?;
        let mut words: HashSet<String> = contents
            .lines()
            .map(|line| line.trim_end().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        words.extend(FIXED_PUNCTUATION.iter().map(|s| s.to_string()));
        Ok(Self { words })
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
