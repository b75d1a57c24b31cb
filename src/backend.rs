//! The NLP backend interface.

use crate::errors::Result;
use std::collections::HashSet;

/// One sentence of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence {
    /// Number of words in the sentence.
    pub words: u64,
}

/// A document-level sentiment score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    /// In [-1, 1]; negative values mean negative sentiment.
    pub polarity: f64,
    /// In [0, 1]; 0 is fully objective.
    pub subjectivity: f64,
}

/// Word segmentation, lemmatization, sentence splitting and sentiment
/// scoring, provided by an external NLP implementation.
///
/// The backend is optional: a [Context](crate::metric::Context) may carry
/// none, in which case metrics that need one fail with a
/// [MissingBackend](crate::errors::MissingBackend) error instead of
/// degrading silently.
pub trait Backend: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    fn lemmatize(&self, word: &str) -> String;

    fn split_sentences(&self, text: &str) -> Vec<Sentence>;

    fn score_sentiment(&self, text: &str) -> Sentiment;

    /// The stopword set for a language, e.g. `"english"`.
    fn stopwords(&self, language: &str) -> Result<HashSet<String>>;
}

impl<'a> std::fmt::Debug for dyn Backend + 'a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}
