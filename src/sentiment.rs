//! Document sentiment: polarity and subjectivity.

use crate::document::{Document, Row, Value, round_to};
use crate::errors::{Result, unsupported};
use crate::metric::{Context, Metric};
use crate::options::{OptKind, OptSpec, Options};

/// The only scoring backend this metric supports.
const LEXICON_BACKEND: &str = "lexicon";

static SENTIMENT_OPTS: [OptSpec; 2] = [
    OptSpec {
        name: "backend",
        help: "which scoring backend to use (only \"lexicon\" is supported)",
        kind: OptKind::Str,
        default: Some(LEXICON_BACKEND),
        required: false,
    },
    OptSpec {
        name: "precision",
        help: "decimal places to round (0 disables rounding)",
        kind: OptKind::UInt,
        default: Some("2"),
        required: false,
    },
];

/// Scores the document's sentiment polarity and subjectivity.
pub struct SentimentAnalysis;

impl SentimentAnalysis {
    fn check_backend(opts: &Options) -> Result<()> {
        match opts.str("backend")? {
            LEXICON_BACKEND => Ok(()),
            other => Err(unsupported(format!(
                "unknown sentiment backend '{other}'; only '{LEXICON_BACKEND}' is supported"
            ))),
        }
    }
}

impl Metric for SentimentAnalysis {
    fn name(&self) -> &'static str {
        "sentiment_analysis"
    }

    fn help(&self) -> &'static str {
        "sentiment analysis over the document text"
    }

    fn options(&self) -> &[OptSpec] {
        &SENTIMENT_OPTS
    }

    fn columns(&self, opts: &Options) -> Result<Vec<String>> {
        SentimentAnalysis::check_backend(opts)?;
        Ok(vec![
            "sentiment_polarity".to_owned(),
            "sentiment_subjectivity".to_owned(),
        ])
    }

    fn process(&self, doc: &Document, opts: &Options, ctx: &Context) -> Result<Row> {
        SentimentAnalysis::check_backend(opts)?;
        let backend = ctx.backend(self.name(), "sentiment scorer")?;
        let precision = opts.uint("precision")?;
        let score = backend.score_sentiment(&doc.text);
        let (polarity, subjectivity) = if precision > 0 {
            (
                round_to(score.polarity, precision),
                round_to(score.subjectivity, precision),
            )
        } else {
            (score.polarity, score.subjectivity)
        };
        let mut row = doc.index_row();
        row.push(Value::Float(polarity));
        row.push(Value::Float(subjectivity));
        Ok(row)
    }
}
