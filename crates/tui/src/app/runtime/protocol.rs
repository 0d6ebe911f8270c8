use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::MalformedFrame;

pub const DIFF_EVENT: &str = "diff";

/// Decoded backend frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    Diff { file_path: String, diff: String },
    Other { kind: String, payload: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundCommand {
    pub connection_id: String,
    pub text: String,
}

#[derive(Serialize)]
pub(crate) struct InputBody<'a> {
    pub text: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct ConnectResponse {
    #[serde(default)]
    pub connection_id: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct PingResponse {
    #[serde(default)]
    pub status: Option<Value>,
}

impl PingResponse {
    pub fn status_text(&self) -> String {
        match &self.status {
            Some(value) => payload_text(value),
            None => "unknown".to_string(),
        }
    }
}

/// Renders a `data` value the way it is logged: strings as-is, everything
/// else as compact JSON.
pub fn payload_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Decodes one streaming frame. A `diff` carries its path either next to
/// `data` or inside it, and its body either as `data` or `data.diff`.
pub fn parse_frame(raw: &str) -> Result<InboundEvent, MalformedFrame> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|error| MalformedFrame::new(format!("invalid JSON ({error})")))?;
    let Some(object) = value.as_object() else {
        return Err(MalformedFrame::new("expected a JSON object"));
    };
    let kind = match object.get("type") {
        Some(Value::String(kind)) if !kind.is_empty() => kind.clone(),
        Some(_) => return Err(MalformedFrame::new("`type` must be a non-empty string")),
        None => return Err(MalformedFrame::new("missing `type`")),
    };
    let Some(data) = object.get("data") else {
        return Err(MalformedFrame::new(format!("`{kind}` frame is missing `data`")));
    };

    if kind != DIFF_EVENT {
        return Ok(InboundEvent::Other {
            kind,
            payload: payload_text(data),
        });
    }

    let file_path = string_field(&value, "file_path")
        .or_else(|| string_field(data, "file_path"))
        .ok_or_else(|| MalformedFrame::new("`diff` frame is missing `file_path`"))?;
    let diff = data
        .as_str()
        .or_else(|| string_field(data, "diff"))
        .ok_or_else(|| MalformedFrame::new("`diff` frame is missing a diff body"))?;
    Ok(InboundEvent::Diff {
        file_path: file_path.to_string(),
        diff: diff.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diff_frame_with_top_level_path() {
        let raw = json!({ "type": "diff", "file_path": "/a.py", "data": "--- a\n+++ b" }).to_string();
        assert_eq!(
            parse_frame(&raw),
            Ok(InboundEvent::Diff {
                file_path: "/a.py".to_string(),
                diff: "--- a\n+++ b".to_string(),
            })
        );
    }

    #[test]
    fn diff_frame_with_nested_path_and_body() {
        let raw = json!({
            "type": "diff",
            "data": { "file_path": "src/main.py", "diff": "@@ -1 +1 @@\n-a\n+b" }
        })
        .to_string();
        assert_eq!(
            parse_frame(&raw),
            Ok(InboundEvent::Diff {
                file_path: "src/main.py".to_string(),
                diff: "@@ -1 +1 @@\n-a\n+b".to_string(),
            })
        );
    }

    #[test]
    fn diff_frame_without_path_is_malformed() {
        let raw = json!({ "type": "diff", "data": "--- a" }).to_string();
        let error = parse_frame(&raw).unwrap_err();
        assert!(error.reason.contains("file_path"));
    }

    #[test]
    fn other_kinds_keep_payload_verbatim() {
        let raw = json!({ "type": "text", "data": "  hello\tworld " }).to_string();
        assert_eq!(
            parse_frame(&raw),
            Ok(InboundEvent::Other {
                kind: "text".to_string(),
                payload: "  hello\tworld ".to_string(),
            })
        );

        let raw = json!({ "type": "final_commands", "data": { "commands": ["git add ."] } })
            .to_string();
        assert_eq!(
            parse_frame(&raw),
            Ok(InboundEvent::Other {
                kind: "final_commands".to_string(),
                payload: r#"{"commands":["git add ."]}"#.to_string(),
            })
        );
    }

    #[test]
    fn structural_failures_are_malformed() {
        assert!(parse_frame("not json").is_err());
        assert!(parse_frame("[1, 2]").is_err());
        assert!(parse_frame(r#"{"data": "x"}"#).is_err());
        assert!(parse_frame(r#"{"type": 3, "data": "x"}"#).is_err());
        assert!(parse_frame(r#"{"type": "text"}"#).is_err());
    }

    #[test]
    fn null_data_is_present_data() {
        assert_eq!(
            parse_frame(r#"{"type": "heartbeat", "data": null}"#),
            Ok(InboundEvent::Other {
                kind: "heartbeat".to_string(),
                payload: "null".to_string(),
            })
        );
    }
}
