//! Call arguments: ordered parameters, list flattening, form encoding.
//!
//! # Design
//! Parameter order is part of the wire behavior (defaults are merged after
//! caller args and win key collisions), so `Params` and its flattened form
//! both preserve insertion order. List values keep only their last element —
//! the upstream client overwrote the same key once per element, and changing
//! that would change what reaches the server.

/// A single argument value: a scalar, or a list subject to flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    /// Flattens to its last element; an empty list contributes nothing.
    Many(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Many(values.into_iter().map(String::from).collect())
    }
}

/// Caller-supplied arguments for one API call, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar argument.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((key.into(), ParamValue::Single(value.into())));
        self
    }

    /// Append a list argument. Flattening keeps only the last element.
    pub fn set_many<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.entries.push((
            key.into(),
            ParamValue::Many(values.into_iter().map(Into::into).collect()),
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn flatten(&self) -> FlatParams {
        let mut flat = FlatParams::default();
        for (key, value) in &self.entries {
            match value {
                ParamValue::Single(v) => flat.insert(key, v),
                ParamValue::Many(vs) => {
                    for v in vs {
                        flat.insert(key, v);
                    }
                }
            }
        }
        flat
    }
}

/// Flattened key/value pairs. Inserting an existing key overwrites its value
/// in place, keeping the key's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlatParams {
    pairs: Vec<(String, String)>,
}

impl FlatParams {
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Some(pair) = self.pairs.iter_mut().find(|pair| pair.0 == key) {
            pair.1 = value.to_string();
        } else {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}
