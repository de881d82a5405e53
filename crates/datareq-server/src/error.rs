//! Server-specific error types
//!
//! [`ActionError`] is what every action handler returns. Its variants follow
//! the order in which handlers check things: missing id, authorization,
//! existence, validation, state conflicts. Infrastructure failures come last.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use datareq_common::DataReqError;
use thiserror::Error;
use uuid::Uuid;

use crate::access::AccessError;
use crate::api::response::ErrorResponse;
use crate::catalog::CatalogError;
use crate::features::shared::validation::ValidationErrors;
use crate::features::shared::validator::ValidationError;
use crate::store::StoreError;

pub type ActionResult<T> = std::result::Result<T, ActionError>;

#[derive(Error, Debug)]
pub enum ActionError {
    /// A required identifier was not supplied
    #[error("{entity} ID has not been included")]
    MissingId { entity: &'static str },

    /// The request itself could not be read (query string, JSON body)
    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{entity} {id} not found in the data base")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    NotAuthorized(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Data request {0} is already closed")]
    AlreadyClosed(Uuid),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ActionError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ActionError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code used in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::MissingId { .. } => "BAD_REQUEST",
            ActionError::InvalidRequest { .. } => "INVALID_REQUEST",
            ActionError::Validation(_) => "VALIDATION_ERROR",
            ActionError::NotFound { .. } => "NOT_FOUND",
            ActionError::NotAuthorized(_) => "FORBIDDEN",
            ActionError::Unauthenticated(_) => "UNAUTHORIZED",
            ActionError::AlreadyClosed(_) => "CONFLICT",
            ActionError::Store(_) => "INTERNAL_ERROR",
            ActionError::Catalog(_) => "CATALOG_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ActionError::MissingId { .. } => StatusCode::BAD_REQUEST,
            ActionError::InvalidRequest { status, .. } => *status,
            ActionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::NotFound { .. } => StatusCode::NOT_FOUND,
            ActionError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            ActionError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ActionError::AlreadyClosed(_) => StatusCode::CONFLICT,
            ActionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Catalog(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<AccessError> for ActionError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated { .. } => ActionError::Unauthenticated(err.to_string()),
            AccessError::Forbidden { .. } => ActionError::NotAuthorized(err.to_string()),
            AccessError::Store(e) => ActionError::Store(e),
        }
    }
}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Invalid(errors) => ActionError::Validation(errors),
            ValidationError::Store(e) => ActionError::Store(e),
            ValidationError::Catalog(e) => ActionError::Catalog(e),
        }
    }
}

impl From<QueryRejection> for ActionError {
    fn from(rejection: QueryRejection) -> Self {
        ActionError::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for ActionError {
    fn from(rejection: JsonRejection) -> Self {
        ActionError::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<ValidationErrors> for ActionError {
    fn from(errors: ValidationErrors) -> Self {
        ActionError::Validation(errors)
    }
}

impl From<DataReqError> for ActionError {
    fn from(err: DataReqError) -> Self {
        match err {
            DataReqError::AlreadyClosed(id) => ActionError::AlreadyClosed(id),
            DataReqError::InvalidVote(_) => ActionError::Validation(ValidationErrors::single("vote", err.to_string())),
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match self {
            ActionError::Validation(ref errors) => {
                let details = serde_json::to_value(errors).unwrap_or(serde_json::Value::Null);
                ErrorResponse::with_details(code, "Validation failed", details)
            }
            ActionError::Store(ref e) => {
                tracing::error!(error = %e, "Storage error");
                ErrorResponse::new(code, "A database error occurred")
            }
            ActionError::Catalog(ref e) => {
                tracing::error!(error = %e, "Catalog error");
                ErrorResponse::new(code, "The catalog could not be reached")
            }
            ref other => ErrorResponse::new(code, other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Action;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ActionError::MissingId { entity: "Data Request" }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ActionError::Validation(ValidationErrors::single("title", "Missing value")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ActionError::not_found("Comment", "abc").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ActionError::AlreadyClosed(Uuid::nil()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_access_errors_split_by_authentication() {
        let anon: ActionError = AccessError::Unauthenticated {
            action: Action::DataRequestCreate,
        }
        .into();
        assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

        let user: ActionError = AccessError::Forbidden {
            action: Action::DataRequestClose,
            user: "u1".to_string(),
        }
        .into();
        assert_eq!(user.status(), StatusCode::FORBIDDEN);
        assert_eq!(user.code(), "FORBIDDEN");
    }

    #[test]
    fn test_domain_errors_convert() {
        let id = Uuid::new_v4();
        let err: ActionError = DataReqError::AlreadyClosed(id).into();
        assert!(matches!(err, ActionError::AlreadyClosed(closed) if closed == id));

        let err: ActionError = DataReqError::InvalidVote(3).into();
        assert!(matches!(err, ActionError::Validation(ref e) if e.contains("vote")));
    }

    #[test]
    fn test_unreadable_request_keeps_rejection_status() {
        let err = ActionError::InvalidRequest {
            status: StatusCode::BAD_REQUEST,
            message: "Failed to deserialize query string".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_REQUEST");
        assert_eq!(err.to_string(), "Failed to deserialize query string");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ActionError::MissingId { entity: "Data Request" }.to_string(),
            "Data Request ID has not been included"
        );
        assert_eq!(
            ActionError::not_found("Comment", "c-1").to_string(),
            "Comment c-1 not found in the data base"
        );
    }
}
