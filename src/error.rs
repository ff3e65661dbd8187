//! Error types and error handling for the application
//!
//! Every failure in the tracking core is represented by [`AppError`]. Errors
//! stay local to the session that caused them; the HTTP surface converts them
//! into JSON responses via `IntoResponse`.

use crate::geo::GeoError;
use crate::state::AgentId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Operation referenced an identifier that is not registered
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Handshake for an identifier that is already registered
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(AgentId),

    /// Latitude, longitude or heading outside the valid range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Sector construction failed
    #[error("Geometry failure: {0}")]
    GeometryFailure(String),

    /// Payment named a recipient that is not registered
    #[error("Recipient not found: {0}")]
    RecipientNotFound(AgentId),

    /// Message arrived before the handshake or after the session closed
    #[error("Session {0} is not active")]
    SessionNotActive(AgentId),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        if err.is_coordinate_error() {
            AppError::InvalidCoordinate(err.to_string())
        } else {
            AppError::GeometryFailure(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::AgentNotFound(_) | AppError::RecipientNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateIdentifier(_) => StatusCode::CONFLICT,
            AppError::InvalidCoordinate(_) => StatusCode::BAD_REQUEST,
            AppError::SessionNotActive(_) => StatusCode::CONFLICT,
            AppError::GeometryFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_error_conversion() {
        let err: AppError = GeoError::InvalidLatitude(100.0).into();
        assert!(matches!(err, AppError::InvalidCoordinate(_)));

        let err: AppError = GeoError::InvalidHeading(400.0).into();
        assert!(matches!(err, AppError::InvalidCoordinate(_)));

        let err: AppError = GeoError::InvalidRadius(-1.0).into();
        assert!(matches!(err, AppError::GeometryFailure(_)));
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::AgentNotFound("a".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::DuplicateIdentifier("a".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::InvalidCoordinate("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
