//! Errors and error-related utilities.

use std::{error, fmt, result};

/// The result type used throughout this library.
///
/// Errors are `Send + Sync` so that they can cross worker-thread
/// boundaries in [crate::corpus::process_corpus].
pub type Result<T> = result::Result<T, Box<dyn error::Error + Send + Sync>>;

/// A metric needs an NLP backend, but none is configured.
#[derive(Debug)]
pub struct MissingBackend {
    pub metric: String,
    pub capability: String,
}

/// An option value that cannot be acted on.
#[derive(Debug)]
pub struct UnsupportedConfiguration(pub String);

/// A metadata table that does not match the expected schema.
#[derive(Debug)]
pub struct MalformedMetadata(pub String);

/// No loadable driver at the given location.
#[derive(Debug)]
pub struct DriverNotFound(pub String);

impl fmt::Display for MissingBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} requires an NLP backend ({}), but none is configured",
            self.metric, self.capability
        )
    }
}

impl fmt::Display for UnsupportedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported configuration: {}", self.0)
    }
}

impl fmt::Display for MalformedMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed metadata: {}", self.0)
    }
}

impl fmt::Display for DriverNotFound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "driver not found: {}", self.0)
    }
}

impl error::Error for MissingBackend {}

impl error::Error for UnsupportedConfiguration {}

impl error::Error for MalformedMetadata {}

impl error::Error for DriverNotFound {}

/// A helper for constructing [MissingBackend].
pub fn missing_backend(metric: &str, capability: &str) -> Box<dyn error::Error + Send + Sync> {
    MissingBackend {
        metric: metric.to_owned(),
        capability: capability.to_owned(),
    }
    .into()
}

/// A helper for constructing [UnsupportedConfiguration].
pub fn unsupported(s: String) -> Box<dyn error::Error + Send + Sync> {
    UnsupportedConfiguration(s).into()
}

/// A helper for constructing [MalformedMetadata].
pub fn malformed_metadata(s: String) -> Box<dyn error::Error + Send + Sync> {
    MalformedMetadata(s).into()
}

/// A helper for constructing [DriverNotFound].
pub fn driver_not_found(s: String) -> Box<dyn error::Error + Send + Sync> {
    DriverNotFound(s).into()
}
