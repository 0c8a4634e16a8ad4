//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Responses carry a JSON body of the form
//! `{"error": "..."}` so the storefront UI can surface messages directly.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::content::ContentError;
use crate::services::{EmailJsError, MailingListError, ResendError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Content store operation failed.
    #[error("Content store error: {0}")]
    Content(#[from] ContentError),

    /// Mailing-list store operation failed.
    #[error("Mailing list error: {0}")]
    MailingList(#[from] MailingListError),

    /// Bulk newsletter delivery failed.
    #[error("Bulk mail error: {0}")]
    BulkMail(#[from] ResendError),

    /// Email template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The order notification email could not be dispatched.
    ///
    /// No `#[from]`: campaign sends tally `EmailJsError` per recipient
    /// instead of propagating, so conversion stays explicit.
    #[error("Order email error: {0}")]
    OrderEmail(EmailJsError),

    /// Request payload failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Wrong HTTP method for this endpoint.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A collaborator this endpoint depends on is not configured.
    #[error("Service not configured: {0}")]
    Unconfigured(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Content(_)
                | Self::MailingList(_)
                | Self::BulkMail(_)
                | Self::Template(_)
                | Self::OrderEmail(_)
                | Self::Unconfigured(_)
                | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Content(_)
            | Self::MailingList(_)
            | Self::BulkMail(_)
            | Self::Template(_)
            | Self::Unconfigured(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OrderEmail(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        };

        // Don't expose internal error details to clients. Unconfigured is
        // the exception: its message names the missing service so operators
        // spot the gap from the response alone.
        let error = match self {
            Self::Content(_)
            | Self::MailingList(_)
            | Self::BulkMail(_)
            | Self::Template(_)
            | Self::Internal(_) => "Internal server error".to_string(),
            Self::OrderEmail(_) => "Failed to place order. Please try again.".to_string(),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
            Self::Validation(message) | Self::NotFound(message) | Self::Unconfigured(message) => {
                message
            }
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
