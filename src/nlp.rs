//! Default English NLP backend.
//!
//! Lemmatization is Snowball stemming, sentences split on terminal
//! punctuation, and sentiment comes from an embedded polarity and
//! subjectivity lexicon with negation handling.

use crate::backend::{Backend, Sentence, Sentiment};
use crate::errors::{Result, unsupported};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence break pattern"));

static STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    include_str!("../resources/stopwords/english.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
});

#[derive(Deserialize)]
struct LexiconEntry {
    polarity: f64,
    subjectivity: f64,
}

static LEXICON: Lazy<HashMap<String, LexiconEntry>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/sentiment/english.json"))
        .expect("valid sentiment lexicon")
});

/// Words that flip the polarity of a nearby sentiment-bearing word.
const NEGATORS: [&str; 8] = [
    "not", "no", "never", "nor", "cannot", "without", "hardly", "scarcely",
];

/// How many preceding tokens are scanned for a negator.
const NEGATION_WINDOW: usize = 3;

/// English backend: Snowball stemmer, regex segmentation, embedded
/// stopword list and sentiment lexicon.
pub struct EnglishBackend {
    stemmer: Stemmer,
}

impl EnglishBackend {
    pub fn new() -> EnglishBackend {
        EnglishBackend {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for EnglishBackend {
    fn default() -> EnglishBackend {
        EnglishBackend::new()
    }
}

impl Backend for EnglishBackend {
    fn tokenize(&self, text: &str) -> Vec<String> {
        WORD.find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }

    fn lemmatize(&self, word: &str) -> String {
        self.stemmer.stem(&word.to_lowercase()).into_owned()
    }

    fn split_sentences(&self, text: &str) -> Vec<Sentence> {
        SENTENCE_BREAK
            .split(text)
            .filter_map(|chunk| {
                let words = WORD.find_iter(chunk).count() as u64;
                if words == 0 { None } else { Some(Sentence { words }) }
            })
            .collect()
    }

    fn score_sentiment(&self, text: &str) -> Sentiment {
        let tokens = self.tokenize(text);
        let mut polarity = 0.0;
        let mut subjectivity = 0.0;
        let mut scored = 0u64;
        for (i, token) in tokens.iter().enumerate() {
            let Some(entry) = LEXICON.get(token) else {
                continue;
            };
            let negated =
                (1..=NEGATION_WINDOW).any(|k| i >= k && NEGATORS.contains(&tokens[i - k].as_str()));
            polarity += if negated { -entry.polarity } else { entry.polarity };
            subjectivity += entry.subjectivity;
            scored += 1;
        }
        if scored == 0 {
            return Sentiment {
                polarity: 0.0,
                subjectivity: 0.0,
            };
        }
        Sentiment {
            polarity: polarity / scored as f64,
            subjectivity: subjectivity / scored as f64,
        }
    }

    fn stopwords(&self, language: &str) -> Result<HashSet<String>> {
        match language {
            "english" => Ok(STOPWORDS.clone()),
            other => Err(unsupported(format!(
                "no stopwords for language '{other}'"
            ))),
        }
    }
}
