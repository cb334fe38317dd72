use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user as resolved from a bearer token.
///
/// Attached to request extensions by the auth middleware; handlers receive it
/// through `Extension<Identity>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
}

/// Public view of a user account. The credential hash never leaves the db layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}
