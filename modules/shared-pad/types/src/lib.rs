//! Shared types for the shared-pad service and its HTTP clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Request Types
// =====================================================

/// Replace a pad's content (`PUT /pad`, `PUT /pad/{chat_id}`, `POST /pad/{chat_id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadWriteRequest {
    pub text: String,
    /// Ignored when the chat id is already part of the path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Action-dispatched request (`POST /pad`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PadActionRequest {
    /// "get" | "set"
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Parsed form of [`PadActionRequest::action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAction {
    Get,
    Set,
}

impl PadAction {
    /// Case-insensitive, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            _ => None,
        }
    }
}

// =====================================================
// Response Types
// =====================================================

/// Response to a read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadTextResponse {
    pub text: String,
}

/// Response to a write, echoing what was stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadWriteResponse {
    pub ok: bool,
    pub text: String,
}

impl PadWriteResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl PadErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: msg.into(),
        }
    }
}

/// Liveness check body (`GET /hi`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!(PadAction::parse("get"), Some(PadAction::Get));
        assert_eq!(PadAction::parse("  SET "), Some(PadAction::Set));
        assert_eq!(PadAction::parse("bogus"), None);
        assert_eq!(PadAction::parse(""), None);
    }

    #[test]
    fn test_action_request_all_fields_optional() {
        let req: PadActionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.action.is_none());
        assert!(req.text.is_none());
        assert!(req.chat_id.is_none());

        let req: PadActionRequest =
            serde_json::from_str(r#"{"action":"set","text":"hi","chat_id":"abc"}"#).unwrap();
        assert_eq!(req.action.as_deref(), Some("set"));
        assert_eq!(req.text.as_deref(), Some("hi"));
        assert_eq!(req.chat_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_write_request_requires_text() {
        assert!(serde_json::from_str::<PadWriteRequest>(r#"{"chat_id":"abc"}"#).is_err());
        let req: PadWriteRequest = serde_json::from_str(r#"{"text":""}"#).unwrap();
        assert_eq!(req.text, "");
        assert!(req.chat_id.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(PadErrorResponse::new("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "error": "nope"}));
    }
}
