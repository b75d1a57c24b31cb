//! Mean sentence length.

use crate::document::{Document, Row, Value, round_to};
use crate::errors::Result;
use crate::metric::{Context, Metric};
use crate::options::{OptKind, OptSpec, Options};

static SENTENCE_OPTS: [OptSpec; 1] = [OptSpec {
    name: "precision",
    help: "decimal places to round (0 disables rounding)",
    kind: OptKind::UInt,
    default: Some("2"),
    required: false,
}];

/// Mean number of words per sentence.
///
/// A document in which the backend finds no sentences has length 0.
pub struct SentenceLength;

impl Metric for SentenceLength {
    fn name(&self) -> &'static str {
        "sentence_length"
    }

    fn help(&self) -> &'static str {
        "sentence length"
    }

    fn options(&self) -> &[OptSpec] {
        &SENTENCE_OPTS
    }

    fn columns(&self, _opts: &Options) -> Result<Vec<String>> {
        Ok(vec!["sentence_length".to_owned()])
    }

    fn process(&self, doc: &Document, opts: &Options, ctx: &Context) -> Result<Row> {
        let backend = ctx.backend(self.name(), "sentence splitter")?;
        let precision = opts.uint("precision")?;
        let sentences = backend.split_sentences(&doc.text);
        let length = if sentences.is_empty() {
            0.0
        } else {
            let words: u64 = sentences.iter().map(|s| s.words).sum();
            words as f64 / sentences.len() as f64
        };
        let length = if precision > 0 {
            round_to(length, precision)
        } else {
            length
        };
        let mut row = doc.index_row();
        row.push(Value::Float(length));
        Ok(row)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::{Backend, Sentence, Sentiment};
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    /// Splits on '.' and counts whitespace-separated words.
    struct StubBackend;

    impl Backend for StubBackend {
        fn tokenize(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(str::to_owned).collect()
        }

        fn lemmatize(&self, word: &str) -> String {
            word.to_owned()
        }

        fn split_sentences(&self, text: &str) -> Vec<Sentence> {
            text.split('.')
                .filter_map(|chunk| {
                    let words = chunk.split_whitespace().count() as u64;
                    if words == 0 { None } else { Some(Sentence { words }) }
                })
                .collect()
        }

        fn score_sentiment(&self, _text: &str) -> Sentiment {
            Sentiment {
                polarity: 0.0,
                subjectivity: 0.0,
            }
        }

        fn stopwords(&self, _language: &str) -> Result<HashSet<String>> {
            Ok(HashSet::new())
        }
    }

    fn run(text: &str, pairs: &[&str]) -> Value {
        let metric = SentenceLength;
        let pairs: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
        let opts = crate::options::resolve(
            metric.options(),
            &crate::options::parse_pairs(&pairs).unwrap(),
        )
        .unwrap();
        let doc = Document::new(vec!["doc".to_owned()], text.to_owned());
        let ctx = Context::new(Some(Arc::new(StubBackend)));
        let mut row = metric.process(&doc, &opts, &ctx).unwrap();
        row.remove(1)
    }

    #[test]
    fn single_sentence() {
        assert_eq!(run("one two three four five.", &[]), Value::Float(5.0));
    }

    #[test]
    fn mean_over_sentences() {
        // 2 and 4 words
        assert_eq!(run("a b. c d e f.", &[]), Value::Float(3.0));
    }

    #[test]
    fn zero_precision_disables_rounding() {
        // 3 and 4 words: 3.5 either way, but 8/3 shows the difference
        assert_eq!(run("a b. c d. e f g h.", &["precision=1"]), Value::Float(2.7));
        assert_eq!(
            run("a b. c d. e f g h.", &["precision=0"]),
            Value::Float(8.0 / 3.0)
        );
    }

    #[test]
    fn no_sentences_yield_zero() {
        assert_eq!(run("", &[]), Value::Float(0.0));
        assert_eq!(run("   ", &[]), Value::Float(0.0));
    }

    #[test]
    fn no_backend_is_an_error() {
        let metric = SentenceLength;
        let opts = crate::options::resolve(metric.options(), &HashMap::new()).unwrap();
        let doc = Document::new(vec!["doc".to_owned()], "a sentence.".to_owned());
        let err = metric
            .process(&doc, &opts, &Context::new(None))
            .unwrap_err();
        assert!(err.to_string().contains("sentence splitter"));
    }
}
