//! Normalization of agent replies into display text.
//!
//! The agent proxy does not commit to a single reply schema. Depending on the
//! agent, the text arrives as `response.data`, `response.result`, a top-level
//! `raw_response`, or a bare string in `response`. The reply is first parsed into
//! [`AgentReply`], then [`AgentReply::display_text`] picks the text.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Shown when a reply parses but contains nothing displayable.
pub const FALLBACK_REPLY: &str =
    "I apologize, but I encountered an issue processing your message. Please try again.";

/// Shown when the request itself fails.
pub const TRANSPORT_ERROR_REPLY: &str =
    "I encountered an error while processing your message. Please try again.";

/// Typed view of an agent reply. Absent and `null` fields are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct AgentReply {
    /// The `response` field.
    pub response: Option<ReplyBody>,
    /// The unstructured `raw_response` field.
    pub raw_response: Option<Value>,
}

/// Shape of the `response` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    /// `response` is a plain string.
    Text(String),
    /// `response` is an object.
    Structured(StructuredBody),
    /// Any other JSON value (number, bool, array).
    Other(Value),
}

/// Fields of an object-shaped `response`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredBody {
    pub data: Option<Value>,
    pub result: Option<Value>,
    /// Only a JSON boolean counts; anything else is `None`.
    pub success: Option<bool>,
}

fn take_non_null(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    map.remove(key).filter(|v| !v.is_null())
}

impl From<Value> for ReplyBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => ReplyBody::Text(text),
            Value::Object(mut map) => ReplyBody::Structured(StructuredBody {
                data: take_non_null(&mut map, "data"),
                result: take_non_null(&mut map, "result"),
                success: map.get("success").and_then(Value::as_bool),
            }),
            other => ReplyBody::Other(other),
        }
    }
}

impl From<Value> for AgentReply {
    /// Non-object replies carry no known fields and parse as empty.
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        Self {
            response: take_non_null(&mut map, "response").map(ReplyBody::from),
            raw_response: take_non_null(&mut map, "raw_response"),
        }
    }
}

impl AgentReply {
    fn structured(&self) -> Option<&StructuredBody> {
        match &self.response {
            Some(ReplyBody::Structured(body)) => Some(body),
            _ => None,
        }
    }

    /// Pick the text to show, first match wins:
    ///
    /// 1. `response.data`
    /// 2. `response.result`
    /// 3. `raw_response` when `response.success` is `false`
    /// 4. `raw_response`
    /// 5. `response` when it is a string
    /// 6. [`FALLBACK_REPLY`]
    pub fn display_text(&self) -> String {
        let body = self.structured();

        body.and_then(|b| b.data.as_ref())
            .or_else(|| body.and_then(|b| b.result.as_ref()))
            .or_else(|| {
                body.filter(|b| b.success == Some(false))
                    .and(self.raw_response.as_ref())
            })
            .or(self.raw_response.as_ref())
            .map(value_text)
            .or_else(|| match &self.response {
                Some(ReplyBody::Text(text)) => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

/// Strings are shown as-is; other values as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalize a decoded reply body straight to display text.
pub fn normalize_reply(value: Value) -> String {
    AgentReply::from(value).display_text()
}
