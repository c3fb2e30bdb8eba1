//! API errors and their status mapping

use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Gateway errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// No such path
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// Unsupported method
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Request line could not be split into method and path
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// POST without a body
    #[error("Missing payload")]
    MissingPayload,

    /// Body is not the expected JSON shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Settlement engine error, passed through unchanged
    #[error(transparent)]
    Settlement(#[from] iou_settlement::Error),

    /// Response could not be produced
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<iou_ledger_core::Error> for ApiError {
    fn from(err: iou_ledger_core::Error) -> Self {
        ApiError::Settlement(err.into())
    }
}

impl ApiError {
    /// HTTP-style status code
    pub fn status_code(&self) -> u16 {
        use iou_ledger_core::Error as LedgerError;

        match self {
            ApiError::RouteNotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::MalformedRequest(_) => 400,
            ApiError::MissingPayload => 400,
            ApiError::MalformedPayload(_) => 400,
            ApiError::Settlement(iou_settlement::Error::Ledger(err)) => match err {
                LedgerError::NotFound(_) => 404,
                LedgerError::Validation(_) => 400,
                LedgerError::Conflict(_) => 409,
                LedgerError::Other(_) => 500,
            },
            ApiError::Settlement(_) => 500,
            ApiError::Internal(_) => 500,
        }
    }

    /// Error category for response bodies
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::RouteNotFound(_) => "route_not_found",
            ApiError::MethodNotAllowed(_) => "method_not_allowed",
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::MissingPayload => "missing_payload",
            ApiError::MalformedPayload(_) => "validation_error",
            ApiError::Settlement(err) => match err.kind() {
                "not_found" => "not_found",
                "validation" => "validation_error",
                "conflict" => "conflict",
                _ => "internal_error",
            },
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// JSON error body
    pub fn to_body(&self) -> String {
        json!({
            "error": {
                "code": self.status_code(),
                "message": self.to_string(),
                "type": self.error_type(),
            }
        })
        .to_string()
    }
}
