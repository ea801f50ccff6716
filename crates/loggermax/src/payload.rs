//! Caller payloads and console arguments.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Forwarded in place of a message when the caller supplied none.
pub const END_PLACEHOLDER: &str = "<< END";

/// What a caller hands to a leveled method.
///
/// The first text part is the "prepend" label; the second part, when
/// present, is the message.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Plain text with no message.
    Text(String),
    /// A structured value with no label.
    Structured(Value),
    /// A label followed by a structured message.
    TextWithStructured(String, Value),
    /// A label followed by a text message.
    TextWithText(String, String),
}

impl Payload {
    /// Wrap any serializable value as a structured payload.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        Payload::Structured(to_value(value))
    }

    /// A text label followed by any serializable message.
    pub fn with_structured<T: Serialize + ?Sized>(prepend: impl Into<String>, value: &T) -> Self {
        Payload::TextWithStructured(prepend.into(), to_value(value))
    }

    /// The prepend as a console argument.
    pub fn prepend_arg(&self) -> Arg {
        match self {
            Payload::Text(text)
            | Payload::TextWithStructured(text, _)
            | Payload::TextWithText(text, _) => Arg::Text(text.clone()),
            Payload::Structured(value) => Arg::Value(value.clone()),
        }
    }

    /// The message as a console argument, or the end placeholder.
    pub fn message_arg(&self) -> Arg {
        match self {
            Payload::Text(_) | Payload::Structured(_) => Arg::Text(END_PLACEHOLDER.to_string()),
            Payload::TextWithStructured(_, value) => Arg::Value(value.clone()),
            Payload::TextWithText(_, message) => Arg::Text(message.clone()),
        }
    }

    pub fn has_message(&self) -> bool {
        matches!(self, Payload::TextWithStructured(..) | Payload::TextWithText(..))
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Structured(value)
    }
}

impl From<(&str, &str)> for Payload {
    fn from((prepend, message): (&str, &str)) -> Self {
        Payload::TextWithText(prepend.to_string(), message.to_string())
    }
}

impl From<(String, String)> for Payload {
    fn from((prepend, message): (String, String)) -> Self {
        Payload::TextWithText(prepend, message)
    }
}

impl From<(&str, Value)> for Payload {
    fn from((prepend, value): (&str, Value)) -> Self {
        Payload::TextWithStructured(prepend.to_string(), value)
    }
}

impl From<(String, Value)> for Payload {
    fn from((prepend, value): (String, Value)) -> Self {
        Payload::TextWithStructured(prepend, value)
    }
}

/// One argument of a console entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    /// Style token consumed by a `%c` marker in the preceding text.
    Style(String),
    /// A live structured value, rendered by the sink.
    Value(Value),
}

impl Arg {
    /// Plain text form used by sinks that do not style.
    pub fn to_plain(&self) -> String {
        match self {
            Arg::Text(text) | Arg::Style(text) => text.clone(),
            Arg::Value(value) => value.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Arg::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Pretty-print a value as JSON indented with one tab per level.
pub fn to_tabbed_json(value: &Value) -> String {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tabbed_json_structure() {
        let text = to_tabbed_json(&json!({"a": 1, "b": [2, 3]}));
        assert_eq!(text, "{\n\t\"a\": 1,\n\t\"b\": [\n\t\t2,\n\t\t3\n\t]\n}");
    }

    #[test]
    fn test_message_placeholder_when_absent() {
        assert_eq!(Payload::from("hi").message_arg(), Arg::Text("<< END".into()));
        assert_eq!(
            Payload::Structured(json!([1])).message_arg(),
            Arg::Text(END_PLACEHOLDER.into())
        );
    }

    #[test]
    fn test_prepend_arg_for_structured_is_value() {
        let payload = Payload::from(json!({"k": "v"}));
        assert_eq!(payload.prepend_arg(), Arg::Value(json!({"k": "v"})));
        assert!(!payload.has_message());
    }

    #[test]
    fn test_tuple_conversions() {
        assert_eq!(
            Payload::from(("label", "msg")),
            Payload::TextWithText("label".into(), "msg".into())
        );
        let payload = Payload::from(("label", json!({"x": true})));
        assert!(payload.has_message());
        assert_eq!(payload.message_arg(), Arg::Value(json!({"x": true})));
    }

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_structured_from_serialize() {
        let payload = Payload::with_structured("point", &Point { x: 1, y: 2 });
        assert_eq!(
            payload,
            Payload::TextWithStructured("point".into(), json!({"x": 1, "y": 2}))
        );
    }

    #[test]
    fn test_arg_plain_forms() {
        assert_eq!(Arg::Value(json!({"a": 1})).to_plain(), "{\"a\":1}");
        assert_eq!(Arg::Text("t".into()).as_text(), Some("t"));
        assert_eq!(Arg::Style("color: red".into()).as_text(), None);
    }
}
