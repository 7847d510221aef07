//! Error types for the SimpleGeo client core.
//!
//! # Design
//! One enum covers every failure the core can surface. `Precondition`
//! failures are raised before any I/O happens; everything else is tied to
//! a single request and never affects other calls. `Decode` is an API
//! error in its own right (see [`ApiError::is_api_error`]) so callers that
//! only care about "the service misbehaved" can match on one predicate.

use thiserror::Error;

/// Errors returned by the signer, the feature model and the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An argument failed validation before any request was issued.
    #[error("precondition failed: {message}")]
    Precondition { message: String },

    /// The response body was not a JSON-encoded Feature. `body` holds the
    /// bytes exactly as received.
    #[error("Could not decode JSON from server. ({source}) content: {}", String::from_utf8_lossy(.body))]
    Decode {
        body: Vec<u8>,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with a status outside 2xx/3xx.
    #[error("{message} (#{status})")]
    Http {
        status: u16,
        message: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    },

    /// Bytes handed to the signer were not valid UTF-8.
    #[error("value is not valid UTF-8: {source}")]
    Encoding {
        #[source]
        source: std::str::Utf8Error,
    },

    /// The transport failed or the body stream ended abnormally.
    #[error("transport failure: {message}")]
    Transport { message: String },
}

impl ApiError {
    pub fn precondition(message: impl Into<String>) -> Self {
        ApiError::Precondition {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    pub(crate) fn decode(body: &[u8], source: serde_json::Error) -> Self {
        ApiError::Decode {
            body: body.to_vec(),
            source,
        }
    }

    /// True for failures reported by (or about the output of) the remote
    /// service: bad statuses and undecodable bodies.
    pub fn is_api_error(&self) -> bool {
        matches!(self, ApiError::Http { .. } | ApiError::Decode { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }

    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_mentions_json_and_content() {
        let source = serde_json::from_str::<serde_json::Value>("this is not json").unwrap_err();
        let err = ApiError::decode(b"this is not json", source);
        let text = err.to_string();
        assert!(text.contains("Could not decode JSON"), "{text}");
        assert!(text.contains("content: this is not json"), "{text}");
        assert!(err.is_decode());
        assert!(err.is_api_error());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn decode_error_keeps_raw_bytes() {
        let raw = b"\xff{";
        let source = serde_json::from_slice::<serde_json::Value>(raw).unwrap_err();
        match ApiError::decode(raw, source) {
            ApiError::Decode { body, .. } => assert_eq!(body, raw),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn http_error_exposes_status() {
        let err = ApiError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
            headers: Vec::new(),
            body: b"{}".to_vec(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Internal Server Error (#500)");
        assert!(!err.is_decode());
    }

    #[test]
    fn precondition_is_not_an_api_error() {
        let err = ApiError::precondition("bad handle");
        assert!(!err.is_api_error());
        assert_eq!(err.to_string(), "precondition failed: bad handle");
    }
}
