//! Domain failure kinds and their HTTP rendering.
//!
//! Services return exactly one [`DomainError`]; storage errors are translated at
//! the call site that raised them and never reach a handler.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use quill_db::StorageError;
use quill_types::api::ErrorBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("maximum title length exceeded")]
    TitleTooLong,

    #[error("content cannot be empty")]
    EmptyContent,

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("password length must be between 8 and 64 characters")]
    PasswordLengthInvalid,

    #[error("invalid ID")]
    InvalidId,

    #[error("cannot subscribe to yourself")]
    SelfSubscription,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid filter to response fields")]
    UnknownField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    Comment,
    User,
    Subscription,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::User => "user",
            Self::Subscription => "subscription",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictKind {
    #[error("email already in use")]
    DuplicateEmail,
}

/// Both variants render the same way a caller would see any other 401; the
/// login message never says whether the email or the password was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnauthorizedKind {
    #[error("invalid email or password")]
    InvalidPassword,

    #[error("unauthorized")]
    InvalidToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(Resource),

    #[error(transparent)]
    Conflict(ConflictKind),

    #[error(transparent)]
    Unauthorized(UnauthorizedKind),

    #[error("token error")]
    Token,

    /// Catch-all for storage and internal failures. Detail is logged where the
    /// failure happened and never rendered.
    #[error("internal server error")]
    Database,
}

impl DomainError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::Token => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Database => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default translation for a storage failure: missing rows mean `missing`
    /// does not exist, anything else is an internal failure.
    ///
    /// Call sites match the storage kinds that carry meaning for them (unique
    /// or foreign key violations) before falling back to this.
    pub fn from_storage(err: StorageError, missing: Resource) -> Self {
        match err {
            StorageError::RowsNotFound => Self::NotFound(missing),
            other => {
                error!("Storage failure while handling {}: {}", missing, other);
                Self::Database
            }
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(
            DomainError::from(ValidationError::TitleTooLong).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::Unauthorized(UnauthorizedKind::InvalidToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(DomainError::Token.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            DomainError::NotFound(Resource::Comment).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::Conflict(ConflictKind::DuplicateEmail).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::Database.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_translation_defaults() {
        assert_eq!(
            DomainError::from_storage(StorageError::RowsNotFound, Resource::Post),
            DomainError::NotFound(Resource::Post)
        );
        for err in [
            StorageError::UniqueViolation,
            StorageError::ForeignKeyViolation,
            StorageError::Other("disk I/O error".into()),
        ] {
            assert_eq!(
                DomainError::from_storage(err, Resource::Post),
                DomainError::Database
            );
        }
    }

    #[test]
    fn messages_do_not_leak_storage_detail() {
        let err = DomainError::from_storage(
            StorageError::Other("no such table: posts".into()),
            Resource::Post,
        );
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(
            DomainError::NotFound(Resource::Subscription).to_string(),
            "subscription not found"
        );
    }

    #[test]
    fn login_failures_share_one_message() {
        let err = DomainError::Unauthorized(UnauthorizedKind::InvalidPassword);
        assert_eq!(err.to_string(), "invalid email or password");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
