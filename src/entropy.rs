//! Shannon entropy over the lemmatized vocabulary of a document.

use crate::document::{Document, Row, Value, round_to};
use crate::errors::Result;
use crate::metric::{Context, Metric};
use crate::options::{OptKind, OptSpec, Options};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

static ENTROPY_OPTS: [OptSpec; 3] = [
    OptSpec {
        name: "word_pattern",
        help: "regular expression defining a \"word\"",
        kind: OptKind::Pattern,
        default: Some(r"\b\w+\b"),
        required: false,
    },
    OptSpec {
        name: "stopwords",
        help: "comma-separated stopwords to ignore (default: the backend's English stopwords)",
        kind: OptKind::List,
        default: None,
        required: false,
    },
    OptSpec {
        name: "precision",
        help: "decimal places to round",
        kind: OptKind::UInt,
        default: Some("2"),
        required: false,
    },
];

/// Shannon entropy, in bits, of the document's retained-lemma distribution.
///
/// Words are segmented by `word_pattern`, lemmatized through the shared
/// cache, and dropped when the lemma is a stopword. A document with no
/// retained lemmas has entropy 0.
pub struct ShannonEntropy;

impl Metric for ShannonEntropy {
    fn name(&self) -> &'static str {
        "shannon_entropy"
    }

    fn help(&self) -> &'static str {
        "Shannon entropy"
    }

    fn options(&self) -> &[OptSpec] {
        &ENTROPY_OPTS
    }

    fn columns(&self, _opts: &Options) -> Result<Vec<String>> {
        Ok(vec!["shannon_entropy".to_owned()])
    }

    fn process(&self, doc: &Document, opts: &Options, ctx: &Context) -> Result<Row> {
        let backend = ctx.backend(self.name(), "lemmatizer")?;
        let pattern = opts.pattern("word_pattern")?;
        let precision = opts.uint("precision")?;
        let stopwords: HashSet<String> = match opts.list_opt("stopwords") {
            Some(list) => list.iter().cloned().collect(),
            None => backend.stopwords("english")?,
        };
        let lemmas = pattern
            .find_iter(&doc.text)
            .map(|word| ctx.lemmatize(backend, word.as_str()))
            .filter(|lemma| !stopwords.contains(lemma))
            .collect_vec();
        let mut row = doc.index_row();
        row.push(Value::Float(round_to(entropy(&lemmas), precision)));
        Ok(row)
    }
}

/// `H = -Σ p·log2(p)` over the lemma distribution, 0 for an empty one.
fn entropy(lemmas: &[String]) -> f64 {
    if lemmas.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for lemma in lemmas {
        *counts.entry(lemma).or_insert(0) += 1;
    }
    let n = lemmas.len() as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / n;
            -(p * p.log2())
        })
        .sum()
}
