//! Run header: the configuration actually used by a generation run.

use std::collections::BTreeMap;
use std::fmt;

/// A single header entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum HeaderValue {
    /// Free text (model names, distribution names)
    Text(String),
    /// Floating-point setting
    Number(f64),
    /// Integer setting (seeds)
    Integer(u64),
    /// Switch
    Flag(bool),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Text(s) => write!(f, "{}", s),
            HeaderValue::Number(x) => write!(f, "{}", x),
            HeaderValue::Integer(n) => write!(f, "{}", n),
            HeaderValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Number(value)
    }
}

impl From<u64> for HeaderValue {
    fn from(value: u64) -> Self {
        HeaderValue::Integer(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Flag(value)
    }
}

/// Ordered key/value metadata describing a generation run.
///
/// Keys are kept sorted so two runs with the same configuration serialise
/// identically.
///
/// # Example
///
/// ```
/// use popsim_models::header::{Header, HeaderValue};
///
/// let mut header = Header::new();
/// header.insert("obj_type", "SNIa");
/// header.insert("rate", 3e-5);
/// assert_eq!(header.get("obj_type"), Some(&HeaderValue::Text("SNIa".into())));
/// assert_eq!(header.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Header {
    entries: BTreeMap<String, HeaderValue>,
}

impl Header {
    /// Creates an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HeaderValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Looks up an entry.
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries.get(key)
    }

    /// Numeric value of an entry, if it is a number or an integer.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.entries.get(key)? {
            HeaderValue::Number(x) => Some(*x),
            HeaderValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns true when `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true for an empty header.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut header = Header::new();
        header.insert("M0", -19.05);
        header.insert("M0", -19.1);
        assert_eq!(header.get_f64("M0"), Some(-19.1));
        assert_eq!(header.len(), 1);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut header = Header::new();
        header.insert("rate_pw", 0.0);
        header.insert("model_name", "salt2");
        header.insert("alpha", 0.14);
        let keys: Vec<&str> = header.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "model_name", "rate_pw"]);
    }

    #[test]
    fn test_get_f64_rejects_text() {
        let mut header = Header::new();
        header.insert("dist_x1", "N21");
        header.insert("root_seed", 42u64);
        assert_eq!(header.get_f64("dist_x1"), None);
        assert_eq!(header.get_f64("root_seed"), Some(42.0));
        assert!(!header.contains_key("missing"));
    }

    #[test]
    fn test_display() {
        assert_eq!(HeaderValue::from(true).to_string(), "true");
        assert_eq!(HeaderValue::from("salt3").to_string(), "salt3");
    }
}
