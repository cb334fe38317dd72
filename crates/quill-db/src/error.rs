use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

/// Storage-level failure categories.
///
/// Callers in the service layer decide what each kind means for the operation
/// that raised it; nothing above the service layer ever sees these.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("rows not found")]
    RowsNotFound,

    #[error("unique violation")]
    UniqueViolation,

    #[error("foreign key violation")]
    ForeignKeyViolation,

    #[error("database error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => Self::RowsNotFound,
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
                match e.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Self::UniqueViolation
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKeyViolation,
                    _ => Self::Other(err.to_string()),
                }
            }
            _ => Self::Other(err.to_string()),
        }
    }
}
