//! Input normalization: one document or many, resolved once at the boundary.
//!
//! Every operation accepts anything convertible into [`Input`] and works on
//! the resulting [`Documents`] sequence. A lone document becomes a length-1
//! sequence; nothing downstream re-checks the shape.

use crate::{MpedsError, Result};
use serde_json::Value;
use std::borrow::Cow;

/// Caller-supplied input: a single document or an ordered batch.
#[derive(Debug, Clone)]
pub enum Input<'a> {
    Single(Cow<'a, str>),
    Batch(Vec<Cow<'a, str>>),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(doc: &'a str) -> Self {
        Input::Single(Cow::Borrowed(doc))
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(doc: &'a String) -> Self {
        Input::Single(Cow::Borrowed(doc.as_str()))
    }
}

impl From<String> for Input<'static> {
    fn from(doc: String) -> Self {
        Input::Single(Cow::Owned(doc))
    }
}

impl From<Vec<String>> for Input<'static> {
    fn from(docs: Vec<String>) -> Self {
        Input::Batch(docs.into_iter().map(Cow::Owned).collect())
    }
}

impl<'a> From<Vec<&'a str>> for Input<'a> {
    fn from(docs: Vec<&'a str>) -> Self {
        Input::Batch(docs.into_iter().map(Cow::Borrowed).collect())
    }
}

impl<'a> From<&'a [String]> for Input<'a> {
    fn from(docs: &'a [String]) -> Self {
        Input::Batch(docs.iter().map(|d| Cow::Borrowed(d.as_str())).collect())
    }
}

impl<'a> From<&[&'a str]> for Input<'a> {
    fn from(docs: &[&'a str]) -> Self {
        Input::Batch(docs.iter().map(|d| Cow::Borrowed(*d)).collect())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Input<'a> {
    fn from(docs: [&'a str; N]) -> Self {
        Input::Batch(docs.into_iter().map(Cow::Borrowed).collect())
    }
}

/// Ordered, length-stable document sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Documents<'a> {
    docs: Vec<Cow<'a, str>>,
    scalar: bool,
}

impl<'a> Documents<'a> {
    /// Wrap a lone document into a length-1 sequence; keep batches in order.
    pub fn normalize(input: impl Into<Input<'a>>) -> Self {
        match input.into() {
            Input::Single(doc) => Self {
                docs: vec![doc],
                scalar: true,
            },
            Input::Batch(docs) => Self {
                docs,
                scalar: false,
            },
        }
    }

    /// True when the caller passed a single document rather than a batch.
    pub fn is_scalar(&self) -> bool {
        self.scalar
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.docs.iter().map(|d| d.as_ref())
    }

    pub(crate) fn as_slice(&self) -> &[Cow<'a, str>] {
        &self.docs
    }
}

impl Documents<'static> {
    /// Accept a JSON string (scalar) or an array of strings (batch).
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::String(doc) => Ok(Self::normalize(doc)),
            Value::Array(items) => {
                let mut docs = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Value::String(doc) => docs.push(doc),
                        other => {
                            return Err(MpedsError::InvalidInput(format!(
                                "element {i} is {}, expected text",
                                json_kind(&other)
                            )));
                        }
                    }
                }
                Ok(Self::normalize(docs))
            }
            other => Err(MpedsError::InvalidInput(format!(
                "expected a string or an array of strings, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// One document per non-empty line of UTF-8 text.
    pub fn from_lines(raw: Vec<u8>) -> Result<Self> {
        let text = String::from_utf8(raw)
            .map_err(|e| MpedsError::InvalidInput(format!("input is not valid UTF-8: {e}")))?;
        let docs: Vec<String> = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self::normalize(docs))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
