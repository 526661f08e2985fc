//! Dataverse-specific error handling.

use serde::Deserialize;
use tagkit_core::Error;

/// Error body returned by the Web API.
#[derive(Debug, Deserialize)]
pub struct DataverseErrorResponse {
    pub error: DataverseError,
}

#[derive(Debug, Deserialize)]
pub struct DataverseError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Map an HTTP status and error message to a tagkit Error.
pub fn from_status(status: u16, message: &str) -> Error {
    match status {
        401 | 403 => Error::Config(format!("Authentication failed: {}", message)),
        404 => Error::NotFound(message.to_string()),
        _ => Error::Remote {
            status,
            message: message.to_string(),
        },
    }
}

/// Extract the message from an error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<DataverseErrorResponse>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ if body.is_empty() => "Unknown error".to_string(),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_auth() {
        assert!(matches!(from_status(401, "bad token"), Error::Config(_)));
        assert!(matches!(from_status(403, "no privilege"), Error::Config(_)));
    }

    #[test]
    fn test_from_status_not_found() {
        assert!(matches!(from_status(404, "gone"), Error::NotFound(_)));
    }

    #[test]
    fn test_from_status_remote() {
        match from_status(429, "slow down") {
            Error::Remote { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "slow down");
            }
            other => panic!("Expected Remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_message_parses_body() {
        let body = r#"{"error":{"code":"0x80040217","message":"Entity does not exist"}}"#;
        assert_eq!(error_message(body), "Entity does not exist");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(""), "Unknown error");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
