use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::leave_request::LeaveStatus;
use crate::response;
use crate::store::StoreError;

/// Application-level failures. Every variant carries enough context to build
/// the human-readable message callers see; `kind` groups them into the four
/// business categories plus auth/internal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("End date: {end} is before Start date: {start}")]
    DateOrder { start: NaiveDate, end: NaiveDate },

    #[error("Reason cannot exceed 128 characters")]
    ReasonTooLong,

    #[error("Reason must be provided")]
    ReasonRequired,

    #[error("Leave length ({requested}) exceeds employee balance ({balance})")]
    InsufficientBalance { requested: i64, balance: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("Dates overlap with existing request (ID: {existing})")]
    OverlappingRequest { existing: u64 },

    #[error("User with id: {0} not found")]
    UserNotFound(u64),

    #[error("Leave request with ID: {request_id} could not be found for user with ID: {employee_id}")]
    RequestNotFound { employee_id: u64, request_id: u64 },

    #[error("No leave requests found for user ID: {0}")]
    NoRequests(u64),

    #[error("{0}")]
    NotFound(String),

    #[error("Leave request has status: {status}. Cannot be {action}")]
    InvalidState {
        status: LeaveStatus,
        action: &'static str,
    },

    #[error("User: {0} attempted to access unauthorised route")]
    Forbidden(String),

    #[error("Leave request {request_id} was marked {status} but the balance adjustment failed")]
    BalanceOutOfSync {
        request_id: u64,
        status: LeaveStatus,
        #[source]
        source: StoreError,
    },

    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    InvalidState,
    Forbidden,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::DateOrder { .. }
            | AppError::ReasonTooLong
            | AppError::ReasonRequired
            | AppError::InsufficientBalance { .. }
            | AppError::Validation(_) => ErrorKind::Validation,
            AppError::OverlappingRequest { .. } | AppError::Store(StoreError::Duplicate(_)) => {
                ErrorKind::Conflict
            }
            AppError::UserNotFound(_)
            | AppError::RequestNotFound { .. }
            | AppError::NoRequests(_)
            | AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::InvalidState { .. } => ErrorKind::InvalidState,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::BalanceOutOfSync { .. } | AppError::Store(_) => ErrorKind::Internal,
        }
    }
}

impl ResponseError for AppError {
    // Business failures all surface as 400 with a distinguishing message,
    // matching what clients of this API already rely on.
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        response::error(self.status_code(), &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_map_to_bad_request() {
        let err = AppError::InsufficientBalance {
            requested: 5,
            balance: 3,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = AppError::OverlappingRequest { existing: 7 };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn store_failures_are_internal() {
        let err = AppError::Store(StoreError::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_state_names_the_current_status() {
        let err = AppError::InvalidState {
            status: LeaveStatus::Approved,
            action: "approved",
        };
        assert_eq!(
            err.to_string(),
            "Leave request has status: Approved. Cannot be approved"
        );
    }
}
