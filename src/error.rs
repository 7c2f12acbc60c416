//! API Error Types
//!
//! `AppError` is the only error type handlers return. Each variant maps to one
//! HTTP status and one stable machine-readable code. Internal failures are
//! logged and replaced by a generic message before leaving the process.

use crate::api::ApiResponse;
use crate::db::StoreError;
use crate::directory::DirectoryError;
use crate::mentorship::MentorshipError;
use crate::profile::ProfileError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error payload inside the response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    /// e.g. "NOT_FOUND", "INVALID_TRANSITION"
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Logged, never returned to the client
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Internal(detail) = self {
            log::error!("[API] Internal error: {}", detail);
        }

        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(ErrorDetail {
            code: self.code().to_string(),
            message: self.client_message(),
        }))
    }
}

// ============================================================
// DOMAIN ERROR CONVERSIONS
// ============================================================

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<MentorshipError> for AppError {
    fn from(err: MentorshipError) -> Self {
        match err {
            MentorshipError::NotFound(msg) => Self::NotFound(msg),
            MentorshipError::Forbidden(msg) => Self::Forbidden(msg),
            MentorshipError::Validation(msg) => Self::Validation(msg),
            MentorshipError::InvalidTransition { .. } => Self::InvalidTransition(err.to_string()),
            MentorshipError::Store(e) => e.into(),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Validation(msg) => Self::Validation(msg),
            DirectoryError::NotFound(_) => Self::NotFound(err.to_string()),
            DirectoryError::Store(e) => e.into(),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(msg) => Self::NotFound(msg),
            ProfileError::Forbidden(msg) => Self::Forbidden(msg),
            ProfileError::Validation(msg) => Self::Validation(msg),
            ProfileError::Store(e) => e.into(),
        }
    }
}
