//! Uniform success envelope.
//!
//! Every endpoint responds with `{"success": true, "data": ...}` on success
//! (optionally with a `message`) and `{"success": false, "error": "..."}`
//! on failure (see `error.rs`).

use serde::Serialize;

/// Success envelope wrapping a response payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a payload in the success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Attaches a human-readable message to the envelope.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let response = ApiResponse::ok(42);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"success":true,"data":42}"#);
    }

    #[test]
    fn test_envelope_with_message() {
        let response = ApiResponse::ok(serde_json::json!({"id": 1})).with_message("Created");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"message\":\"Created\""));
    }
}
