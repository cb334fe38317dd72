use tracing::{error, info, warn};

use quill_db::{Database, StorageError, models::UserRow};
use quill_types::models::{Identity, User};

use crate::auth::AppStateInner;
use crate::error::{ConflictKind, DomainError, Resource, UnauthorizedKind};
use crate::service::parse_timestamp;
use crate::validation::{validate_email, validate_id, validate_password};

fn user_from_row(row: UserRow) -> User {
    User {
        id: row.id,
        email: row.email,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn register(state: &AppStateInner, email: &str, password: &str) -> Result<User, DomainError> {
    info!("Registering new user {}", email);

    validate_email(email)?;
    validate_password(password)?;

    let digest = state.hasher.hash(password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        DomainError::Database
    })?;

    let row = state.db.create_user(email, &digest).map_err(|e| match e {
        StorageError::UniqueViolation => {
            warn!("User with email {} already exists", email);
            DomainError::Conflict(ConflictKind::DuplicateEmail)
        }
        other => DomainError::from_storage(other, Resource::User),
    })?;

    info!("Registered user {} ({})", row.id, row.email);
    Ok(user_from_row(row))
}

/// Verify credentials and mint a token. Unknown email and wrong password are
/// indistinguishable to the caller, including in how long they take.
pub fn login(
    state: &AppStateInner,
    email: &str,
    password: &str,
) -> Result<(User, String), DomainError> {
    info!("Login attempt for {}", email);

    validate_password(password)?;

    let row = match state.db.get_user_by_email(email) {
        Ok(row) => row,
        Err(StorageError::RowsNotFound) => {
            state.hasher.verify_dummy(password);
            warn!("Login for unknown email {}", email);
            return Err(DomainError::Unauthorized(UnauthorizedKind::InvalidPassword));
        }
        Err(other) => return Err(DomainError::from_storage(other, Resource::User)),
    };

    if !state.hasher.verify(&row.password_hash, password) {
        warn!("Invalid password for user {}", row.id);
        return Err(DomainError::Unauthorized(UnauthorizedKind::InvalidPassword));
    }

    let token = state.tokens.issue(row.id).map_err(|e| {
        error!("Failed to issue token for user {}: {}", row.id, e);
        DomainError::Token
    })?;

    info!("User {} logged in", row.id);
    Ok((user_from_row(row), token))
}

pub fn get_user(db: &Database, id: i64) -> Result<User, DomainError> {
    validate_id(id)?;

    let row = db
        .get_user_by_id(id)
        .map_err(|e| DomainError::from_storage(e, Resource::User))?;
    Ok(user_from_row(row))
}

/// Re-check that a token's subject still exists. A missing user is an auth
/// failure, not a 404.
pub fn resolve_identity(db: &Database, user_id: i64) -> Result<Identity, DomainError> {
    match db.get_user_by_id(user_id) {
        Ok(row) => Ok(Identity {
            id: row.id,
            email: row.email,
        }),
        Err(StorageError::RowsNotFound) => {
            warn!("Token subject {} no longer exists", user_id);
            Err(DomainError::Unauthorized(UnauthorizedKind::InvalidToken))
        }
        Err(other) => Err(DomainError::from_storage(other, Resource::User)),
    }
}
