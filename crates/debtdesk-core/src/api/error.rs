use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session expired or credentials rejected")]
    Unauthorized(Option<String>),

    #[error("Request failed with status {status}: {}", error_detail(.message, .body))]
    Application {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn error_detail(message: &Option<String>, body: &str) -> String {
    message.clone().unwrap_or_else(|| body.to_string())
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape the backend uses for non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    fn extract_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            code => ApiError::Application {
                status: code,
                message,
                body: Self::truncate_body(body),
            },
        }
    }

    /// Message supplied by the server in the error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(message) | ApiError::Application { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_unauthorized() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid credentials"}"#,
        );
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Invalid credentials"));

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_from_status_application() {
        let err =
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Email taken"}"#);
        match err {
            ApiError::Application { status, ref message, .. } => {
                assert_eq!(status, 422);
                assert_eq!(message.as_deref(), Some("Email taken"));
            }
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.to_string(), "Request failed with status 422: Email taken");
    }

    #[test]
    fn test_from_status_without_message_uses_body() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "Request failed with status 502: upstream down");

        // Blank messages do not count
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"  "}"#);
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_truncate_body() {
        let short = "x".repeat(10);
        assert_eq!(ApiError::truncate_body(&short), short);

        let long = "é".repeat(400); // 800 bytes, 2 bytes per char
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
        assert!(truncated.starts_with(&"é".repeat(250)));
    }
}
