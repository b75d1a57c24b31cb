pub mod backend;
pub mod corpus;
pub mod document;
pub mod entropy;
pub mod errors;
pub mod metric;
#[cfg(feature = "nlp")]
pub mod nlp;
pub mod options;
pub mod plugin;
pub mod registry;
pub mod sanity;
pub mod sentences;
pub mod sentiment;
pub mod words;
