//! Declarative option schemas and their resolution.
//!
//! Each metric declares its options as a static list of [OptSpec] values.
//! [resolve] turns raw `key=value` input into a typed [Options] map,
//! applying defaults and parsers, so that a bad configuration is rejected
//! before any document is processed.

use crate::errors::{Result, unsupported};
use itertools::Itertools;
use regex::Regex;
use std::collections::HashMap;

/// How an option value is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptKind {
    Str,
    UInt,
    Float,
    /// A regular expression.
    Pattern,
    /// A comma-separated list of strings.
    List,
}

/// One configurable option of a metric.
#[derive(Debug, Clone, Copy)]
pub struct OptSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: OptKind,
    /// Applied when the caller omits the option; parsed like any value.
    pub default: Option<&'static str>,
    pub required: bool,
}

/// A resolved option value.
#[derive(Debug, Clone)]
pub enum OptValue {
    Str(String),
    UInt(u64),
    Float(f64),
    Pattern(Regex),
    List(Vec<String>),
}

/// Resolved options for one metric run.
///
/// Optional options without a default are simply absent from the map.
#[derive(Debug, Default)]
pub struct Options {
    values: HashMap<&'static str, OptValue>,
}

impl Options {
    pub fn str_opt(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(OptValue::Str(v)) => Some(v),
            _ => None,
        }
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        self.str_opt(name)
            .ok_or_else(|| unsupported(format!("option '{name}' is not a string or not set")))
    }

    pub fn uint(&self, name: &str) -> Result<u64> {
        match self.values.get(name) {
            Some(OptValue::UInt(v)) => Ok(*v),
            _ => Err(unsupported(format!(
                "option '{name}' is not an integer or not set"
            ))),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.values.get(name) {
            Some(OptValue::Float(v)) => Ok(*v),
            _ => Err(unsupported(format!(
                "option '{name}' is not a number or not set"
            ))),
        }
    }

    pub fn pattern(&self, name: &str) -> Result<&Regex> {
        match self.values.get(name) {
            Some(OptValue::Pattern(v)) => Ok(v),
            _ => Err(unsupported(format!(
                "option '{name}' is not a pattern or not set"
            ))),
        }
    }

    pub fn list(&self, name: &str) -> Result<&[String]> {
        self.list_opt(name)
            .ok_or_else(|| unsupported(format!("option '{name}' is not a list or not set")))
    }

    pub fn list_opt(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name) {
            Some(OptValue::List(v)) => Some(v),
            _ => None,
        }
    }
}

/// Resolve raw option input against the declared specs.
///
/// Unknown names, missing required options and unparsable values are all
/// rejected here, so schema problems surface before a long corpus run.
pub fn resolve(specs: &[OptSpec], raw: &HashMap<String, String>) -> Result<Options> {
    for key in raw.keys() {
        if !specs.iter().any(|s| s.name == key) {
            let known = specs.iter().map(|s| s.name).join(", ");
            return Err(unsupported(format!(
                "unknown option '{key}'; known options: {known}"
            )));
        }
    }
    let mut values = HashMap::new();
    for spec in specs {
        let given = raw.get(spec.name).map(String::as_str).or(spec.default);
        match given {
            Some(value) => {
                values.insert(spec.name, parse(spec, value)?);
            }
            None if spec.required => {
                return Err(unsupported(format!(
                    "missing required option '{}'",
                    spec.name
                )));
            }
            None => (),
        }
    }
    Ok(Options { values })
}

fn parse(spec: &OptSpec, value: &str) -> Result<OptValue> {
    let parsed = match spec.kind {
        OptKind::Str => OptValue::Str(value.to_owned()),
        OptKind::UInt => OptValue::UInt(value.parse().map_err(|_| {
            unsupported(format!(
                "option '{}' expects a non-negative integer, got '{value}'",
                spec.name
            ))
        })?),
        OptKind::Float => OptValue::Float(value.parse().map_err(|_| {
            unsupported(format!(
                "option '{}' expects a number, got '{value}'",
                spec.name
            ))
        })?),
        OptKind::Pattern => OptValue::Pattern(Regex::new(value).map_err(|e| {
            unsupported(format!("option '{}' is not a valid pattern: {e}", spec.name))
        })?),
        OptKind::List => OptValue::List(
            value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
    };
    Ok(parsed)
}

/// Parse CLI-style `key=value` pairs into a raw option map.
pub fn parse_pairs(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut raw = HashMap::new();
    for pair in pairs {
        let parts = pair.splitn(2, '=').collect_vec();
        if parts.len() != 2 {
            return Err(unsupported(format!(
                "option should be of the form 'key=value', got '{pair}'"
            )));
        }
        raw.insert(parts[0].to_owned(), parts[1].to_owned());
    }
    Ok(raw)
}

#[cfg(test)]
mod test {
    use super::*;

    static SPECS: [OptSpec; 4] = [
        OptSpec {
            name: "word_pattern",
            help: "pattern",
            kind: OptKind::Pattern,
            default: Some(r"\b\w+\b"),
            required: false,
        },
        OptSpec {
            name: "precision",
            help: "decimals",
            kind: OptKind::UInt,
            default: Some("2"),
            required: false,
        },
        OptSpec {
            name: "terms",
            help: "terms",
            kind: OptKind::List,
            default: None,
            required: true,
        },
        OptSpec {
            name: "total_label",
            help: "label",
            kind: OptKind::Str,
            default: None,
            required: false,
        },
    ];

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_are_applied() {
        let opts = resolve(&SPECS, &raw(&[("terms", "a,b")])).unwrap();
        assert_eq!(opts.uint("precision").unwrap(), 2);
        assert!(opts.pattern("word_pattern").unwrap().is_match("word"));
        assert_eq!(opts.list("terms").unwrap(), ["a", "b"]);
        assert_eq!(opts.str_opt("total_label"), None);
    }

    #[test]
    fn values_override_defaults() {
        let opts = resolve(&SPECS, &raw(&[("terms", "a"), ("precision", "4")])).unwrap();
        assert_eq!(opts.uint("precision").unwrap(), 4);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = resolve(&SPECS, &raw(&[("terms", "a"), ("bogus", "1")])).unwrap_err();
        assert!(err.to_string().contains("unknown option 'bogus'"));
    }

    #[test]
    fn missing_required_is_rejected() {
        let err = resolve(&SPECS, &raw(&[])).unwrap_err();
        assert!(err.to_string().contains("terms"));
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = resolve(&SPECS, &raw(&[("terms", "a"), ("precision", "x")])).unwrap_err();
        assert!(err.to_string().contains("precision"));
        let err = resolve(&SPECS, &raw(&[("terms", "a"), ("word_pattern", "(")])).unwrap_err();
        assert!(err.to_string().contains("word_pattern"));
    }

    #[test]
    fn list_values_are_trimmed() {
        let opts = resolve(&SPECS, &raw(&[("terms", " a , b ,")])).unwrap();
        assert_eq!(opts.list("terms").unwrap(), ["a", "b"]);
    }

    #[test]
    fn parse_pairs_basic() {
        let raw = parse_pairs(&["a=1".to_owned(), "b=x=y".to_owned()]).unwrap();
        assert_eq!(raw["a"], "1");
        assert_eq!(raw["b"], "x=y");
        assert!(parse_pairs(&["nope".to_owned()]).is_err());
    }
}
