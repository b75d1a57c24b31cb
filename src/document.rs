//! Documents and result-row values.

use serde::Serialize;
use std::fmt;

/// One document of the corpus.
///
/// The index fields identify the document within the corpus and are owned
/// by the corpus layer; the text is the raw content. Every metric emits
/// the index fields unchanged at the start of its result row.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub index: Vec<String>,
    pub text: String,
}

impl Document {
    pub fn new(index: Vec<String>, text: String) -> Document {
        Document { index, text }
    }

    /// The index fields as result cells, in order.
    pub fn index_row(&self) -> Row {
        self.index.iter().map(|i| Value::Str(i.clone())).collect()
    }
}

/// A single cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
        }
    }
}

/// One result row: the document's index fields followed by one cell per
/// output column of the metric.
pub type Row = Vec<Value>;

/// Round to `precision` decimal places.
pub fn round_to(value: f64, precision: u64) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn index_row_preserves_order() {
        let doc = Document::new(vec!["a".to_owned(), "b".to_owned()], "text".to_owned());
        assert_eq!(
            doc.index_row(),
            vec![Value::Str("a".to_owned()), Value::Str("b".to_owned())]
        );
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("x/y".to_owned()).to_string(), "x/y");
    }

    #[test]
    fn round_to_basic() {
        assert_eq!(round_to(0.9182958340544896, 2), 0.92);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(1.0 / 3.0, 4), 0.3333);
    }
}
