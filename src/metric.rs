//! The metric descriptor contract and the per-run execution context.

use crate::backend::Backend;
use crate::document::{Document, Row};
use crate::errors::{Result, missing_backend};
use crate::options::{OptSpec, Options};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A self-describing per-document metric.
///
/// A metric declares its configurable options, the output columns it
/// produces for a given configuration, and a per-document transform.
/// For every document and every valid option set,
/// `process(doc, opts, ctx)` returns the document's index fields followed
/// by exactly one cell per name in `columns(opts)`, in order.
///
/// `process` is a pure function of its inputs; the only shared state is
/// the lemma cache in [Context], which affects latency but never results.
pub trait Metric: Send + Sync {
    /// The public name the metric is registered under.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn help(&self) -> &'static str;

    /// The declared option schema.
    fn options(&self) -> &[OptSpec];

    /// Output column names for this configuration.
    ///
    /// Deterministic given the options, and callable before any document
    /// is processed: an unsupported configuration must fail here, not in
    /// the middle of a corpus run.
    fn columns(&self, opts: &Options) -> Result<Vec<String>>;

    /// Compute one result row for one document.
    fn process(&self, doc: &Document, opts: &Options, ctx: &Context) -> Result<Row>;
}

impl std::fmt::Debug for dyn Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metric")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Shared state for one metric run: the optional NLP backend and the
/// lemma cache.
///
/// The cache maps raw words to their lemmas. It is shared across all
/// documents of a run and grows monotonically; vocabulary size bounds it.
pub struct Context {
    backend: Option<Arc<dyn Backend>>,
    lemmas: Mutex<HashMap<String, String>>,
}

impl Context {
    pub fn new(backend: Option<Arc<dyn Backend>>) -> Context {
        Context {
            backend,
            lemmas: Mutex::new(HashMap::new()),
        }
    }

    /// A context carrying the default English backend.
    #[cfg(feature = "nlp")]
    pub fn with_default_backend() -> Context {
        Context::new(Some(Arc::new(crate::nlp::EnglishBackend::new())))
    }

    /// The configured backend, or a `MissingBackend` error naming the
    /// metric that needed it.
    pub fn backend(&self, metric: &str, capability: &str) -> Result<&dyn Backend> {
        match &self.backend {
            Some(backend) => Ok(backend.as_ref()),
            None => Err(missing_backend(metric, capability)),
        }
    }

    /// Lemmatize through the shared cache.
    ///
    /// Insert-if-absent: concurrent calls may lemmatize the same word
    /// more than once, but always agree on the result.
    pub fn lemmatize(&self, backend: &dyn Backend, word: &str) -> String {
        if let Some(lemma) = self.lemmas.lock().unwrap().get(word) {
            return lemma.clone();
        }
        let lemma = backend.lemmatize(word);
        self.lemmas
            .lock()
            .unwrap()
            .entry(word.to_owned())
            .or_insert_with(|| lemma.clone());
        lemma
    }
}
