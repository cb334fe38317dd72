//! Domain services.
//!
//! Each operation validates its input, applies the ownership guard where it
//! mutates, calls the database and translates any storage failure into a
//! single [`DomainError`](crate::error::DomainError). Operations are
//! synchronous; handlers run them through [`run_blocking`].

pub mod comments;
pub mod posts;
pub mod subscriptions;
pub mod users;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, warn};

use crate::auth::{AppState, AppStateInner};
use crate::error::DomainError;

/// Run a service operation on the blocking pool. SQLite and Argon2 both block.
pub async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, DomainError>
where
    F: FnOnce(&AppStateInner) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            DomainError::Database
        })?
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone; treat as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}
