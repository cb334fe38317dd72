//! Database row types. These map directly to SQLite rows and stay independent
//! of the quill-types API models.

#[derive(Debug)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub created_at: String,
}

#[derive(Debug)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub owner_id: i64,
    pub created_at: String,
}
