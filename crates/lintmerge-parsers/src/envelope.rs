//! Shared JSON envelope handling.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Envelope {
    Array,
    Object,
}

impl Envelope {
    fn matches(self, v: &Value) -> bool {
        match self {
            Envelope::Array => v.is_array(),
            Envelope::Object => v.is_object(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Envelope::Array => "array",
            Envelope::Object => "object",
        }
    }
}

/// Decodes the first JSON value in `text`, checks its top-level type, then maps it onto `T`.
///
/// Anything after the first value is ignored: the runner appends the tool's
/// stderr after its stdout.
pub(crate) fn decode<T: DeserializeOwned>(
    text: &str,
    envelope: Envelope,
) -> Result<T, ParseError> {
    let mut values = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    let value = match values.next() {
        Some(v) => v?,
        None => return Err(ParseError::UnexpectedShape("output is empty".to_string())),
    };
    if !envelope.matches(&value) {
        return Err(ParseError::UnexpectedShape(format!(
            "expected a top-level JSON {}, found {}",
            envelope.as_str(),
            value_kind(&value)
        )));
    }
    from_value(value)
}

pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ParseError> {
    serde_json::from_value(value).map_err(|e| ParseError::UnexpectedShape(e.to_string()))
}

/// Drops every line before the first one starting with `open` (e.g. `[` or `{`).
///
/// Returns `None` when no such line exists.
pub fn skip_banner(text: &str, open: char) -> Option<&str> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.starts_with(open) {
            return Some(&text[offset..]);
        }
        offset += line.len();
    }
    None
}

/// Entries of a collection the tool emits either as an object keyed by path
/// or as a list (PHP encodes an empty map as `[]`).
pub(crate) fn keyed_entries(
    value: Value,
    what: &str,
) -> Result<Vec<(Option<String>, Value)>, ParseError> {
    match value {
        Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (Some(k), v)).collect()),
        Value::Array(items) => Ok(items.into_iter().map(|v| (None, v)).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(ParseError::UnexpectedShape(format!(
            "`{what}` must be an object or array, found {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
