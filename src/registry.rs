//! Metric registry: public name to descriptor.

use crate::errors::{Result, unsupported};
use crate::metric::Metric;
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// Mapping from a metric's public name to its descriptor.
///
/// Populated once at startup; read-only afterwards.
#[derive(Default)]
pub struct Registry {
    metrics: HashMap<&'static str, Arc<dyn Metric>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// A registry holding all builtin metrics.
    pub fn with_builtins() -> Registry {
        let mut registry = Registry::new();
        registry.register(Arc::new(crate::words::WordCounter));
        registry.register(Arc::new(crate::words::OccurrenceCounter));
        registry.register(Arc::new(crate::words::ConditionalCounter));
        registry.register(Arc::new(crate::entropy::ShannonEntropy));
        registry.register(Arc::new(crate::sentences::SentenceLength));
        registry.register(Arc::new(crate::sentiment::SentimentAnalysis));
        registry
    }

    pub fn register(&mut self, metric: Arc<dyn Metric>) {
        self.metrics.insert(metric.name(), metric);
    }

    /// Look up a metric by its registered name.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Metric>> {
        match self.metrics.get(name) {
            Some(metric) => Ok(Arc::clone(metric)),
            None => Err(unsupported(format!(
                "unknown metric '{}'; registered metrics: {}",
                name,
                self.names().iter().join(", ")
            ))),
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.metrics.keys().copied().sorted().collect_vec()
    }
}

/// The process-wide builtin registry.
pub fn builtin() -> &'static Registry {
    static REGISTRY: Lazy<Registry> = Lazy::new(Registry::with_builtins);
    &REGISTRY
}
