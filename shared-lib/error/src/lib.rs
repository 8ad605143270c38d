//! Common error types for the gateway.
//!
//! Every failure that can happen while translating an HTTP/JSON request
//! into a gRPC call (and the response back) is one of these variants.

use thiserror::Error;

/// Translation-layer errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request payload was not valid JSON or did not match the target message.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Response message could not be serialized to JSON.
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// The remote call failed or returned an application-level error.
    #[error("Call error: {0}")]
    Call(#[from] tonic::Status),

    /// The inbound request body could not be read.
    #[error("Request body error: {0}")]
    Body(String),

    #[error("No endpoint registered for {method} {path}")]
    RouteNotFound { method: String, path: String },
}

impl GatewayError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Decode(_) => "decode",
            GatewayError::Encode(_) => "encode",
            GatewayError::Call(_) => "call",
            GatewayError::Body(_) => "body",
            GatewayError::RouteNotFound { .. } => "route_not_found",
        }
    }

    /// Returns the gRPC status when this is a call error.
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            GatewayError::Call(status) => Some(status),
            _ => None,
        }
    }
}

/// Result type alias using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        let decode = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        assert_eq!(GatewayError::Decode(decode).kind(), "decode");
        assert_eq!(GatewayError::Body("closed".into()).kind(), "body");

        let err = GatewayError::RouteNotFound {
            method: "GET".into(),
            path: "/greet".into(),
        };
        assert_eq!(err.kind(), "route_not_found");
        assert_eq!(err.to_string(), "No endpoint registered for GET /greet");
    }

    #[test]
    fn test_status_from_call_error() {
        let err: GatewayError = tonic::Status::unavailable("upstream down").into();
        assert_eq!(err.kind(), "call");
        assert_eq!(err.status().map(|s| s.code()), Some(tonic::Code::Unavailable));
        assert!(GatewayError::Body("x".into()).status().is_none());
    }
}
