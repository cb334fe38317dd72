use axum::{
    extract::{FromRequestParts, Path, rejection::PathRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{DomainError, ValidationError};

/// `Path` for numeric ids. A segment that does not parse is an
/// `InvalidId` validation error rendered as JSON, like every other error.
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(PathRejection::FailedToDeserializePathParams(e)) => {
                debug!("Rejected path {}: {}", parts.uri.path(), e.body_text());
                Err(DomainError::Validation(ValidationError::InvalidId))
            }
            Err(e) => {
                error!("Path extraction failed for {}: {}", parts.uri.path(), e);
                Err(DomainError::Database)
            }
        }
    }
}
