//! Backend-free counting metrics: words, term occurrences, conditionals.

use crate::document::{Document, Row, Value};
use crate::errors::{Result, unsupported};
use crate::metric::{Context, Metric};
use crate::options::{OptKind, OptSpec, Options};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::HashMap;

const WORD_PATTERN: OptSpec = OptSpec {
    name: "word_pattern",
    help: "regular expression defining a \"word\"",
    kind: OptKind::Pattern,
    default: Some(r"\b\w+\b"),
    required: false,
};

static WORD_COUNTER_OPTS: [OptSpec; 1] = [WORD_PATTERN];

/// Counts words in the document text.
pub struct WordCounter;

impl Metric for WordCounter {
    fn name(&self) -> &'static str {
        "count_words"
    }

    fn help(&self) -> &'static str {
        "word counter"
    }

    fn options(&self) -> &[OptSpec] {
        &WORD_COUNTER_OPTS
    }

    fn columns(&self, _opts: &Options) -> Result<Vec<String>> {
        Ok(vec!["words".to_owned()])
    }

    fn process(&self, doc: &Document, opts: &Options, _ctx: &Context) -> Result<Row> {
        let pattern = opts.pattern("word_pattern")?;
        let count = pattern.find_iter(&doc.text).count() as i64;
        let mut row = doc.index_row();
        row.push(Value::Int(count));
        Ok(row)
    }
}

static OCCURRENCE_OPTS: [OptSpec; 3] = [
    OptSpec {
        name: "terms",
        help: "comma-separated list of terms to be counted",
        kind: OptKind::List,
        default: None,
        required: true,
    },
    OptSpec {
        name: "total_label",
        help: "also output the sum of occurrences of all terms, under this column name",
        kind: OptKind::Str,
        default: None,
        required: false,
    },
    OptSpec {
        name: "pattern",
        help: "wrapping pattern used to identify a term; {} stands for the term alternation",
        kind: OptKind::Str,
        default: Some(r"\b(?P<match>{})\b"),
        required: false,
    },
];

/// Counts occurrences of caller-specified terms.
///
/// Matching is case-insensitive and whitespace-insensitive: the text is
/// lowercased and whitespace runs are collapsed before scanning. Terms
/// enter the alternation longest first, so a multi-word term is never
/// double-counted by a shorter term it contains.
pub struct OccurrenceCounter;

impl OccurrenceCounter {
    fn terms(opts: &Options) -> Result<Vec<String>> {
        let terms = opts
            .list("terms")?
            .iter()
            .map(|t| t.to_lowercase())
            .collect_vec();
        if terms.is_empty() {
            return Err(unsupported("option 'terms' must not be empty".to_owned()));
        }
        Ok(terms)
    }
}

impl Metric for OccurrenceCounter {
    fn name(&self) -> &'static str {
        "count_occurrences"
    }

    fn help(&self) -> &'static str {
        "term counter for specific words"
    }

    fn options(&self) -> &[OptSpec] {
        &OCCURRENCE_OPTS
    }

    fn columns(&self, opts: &Options) -> Result<Vec<String>> {
        let mut columns = OccurrenceCounter::terms(opts)?;
        if let Some(label) = opts.str_opt("total_label") {
            columns.push(label.to_owned());
        }
        Ok(columns)
    }

    fn process(&self, doc: &Document, opts: &Options, _ctx: &Context) -> Result<Row> {
        let terms = OccurrenceCounter::terms(opts)?;
        let template = opts.str("pattern")?;
        let text = doc.text.split_whitespace().join(" ").to_lowercase();
        let alternation = terms
            .iter()
            .sorted_by_key(|t| Reverse(t.len()))
            .map(|t| regex::escape(t))
            .join("|");
        let combined = Regex::new(&template.replace("{}", &alternation)).map_err(|e| {
            unsupported(format!("option 'pattern' does not form a valid pattern: {e}"))
        })?;
        if !combined.capture_names().any(|n| n == Some("match")) {
            return Err(unsupported(
                "option 'pattern' must define a named group 'match'".to_owned(),
            ));
        }
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for caps in combined.captures_iter(&text) {
            if let Some(m) = caps.name("match") {
                *counts.entry(m.as_str()).or_insert(0) += 1;
            }
        }
        let mut row = doc.index_row();
        for term in &terms {
            row.push(Value::Int(counts.get(term.as_str()).copied().unwrap_or(0)));
        }
        if opts.str_opt("total_label").is_some() {
            row.push(Value::Int(counts.values().sum()));
        }
        Ok(row)
    }
}

static CONDITIONAL_OPTS: [OptSpec; 0] = [];

static CONDITIONAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(if|but|except|provided|when|where|whenever|unless|notwithstanding|in\s+the\s+event|in\s+no\s+event)\b",
    )
    .expect("valid conditionals pattern")
});

/// Counts conditional words and phrases.
///
/// The term set is fixed: "if", "but", "except", "provided", "when",
/// "where", "whenever", "unless", "notwithstanding", "in the event" and
/// "in no event", matched case-sensitively as whole words.
pub struct ConditionalCounter;

impl Metric for ConditionalCounter {
    fn name(&self) -> &'static str {
        "count_conditionals"
    }

    fn help(&self) -> &'static str {
        "count conditional words and phrases"
    }

    fn options(&self) -> &[OptSpec] {
        &CONDITIONAL_OPTS
    }

    fn columns(&self, _opts: &Options) -> Result<Vec<String>> {
        Ok(vec!["conditionals".to_owned()])
    }

    fn process(&self, doc: &Document, _opts: &Options, _ctx: &Context) -> Result<Row> {
        let text = doc.text.lines().join(" ");
        let count = CONDITIONAL_PATTERN.find_iter(&text).count() as i64;
        let mut row = doc.index_row();
        row.push(Value::Int(count));
        Ok(row)
    }
}
