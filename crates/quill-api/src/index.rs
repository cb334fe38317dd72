use axum::{Json, response::IntoResponse};
use serde_json::json;

const ENDPOINTS: &[&str] = &[
    "POST /register",
    "POST /login",
    "GET /users/{id}",
    "GET /posts?fields=id,title",
    "GET /posts/{id}",
    "POST /posts",
    "PATCH /posts/{id}",
    "DELETE /posts/{id}",
    "GET /posts/{id}/comments",
    "POST /posts/{id}/comments",
    "PATCH /posts/{id}/comments/{comment_id}",
    "DELETE /posts/{id}/comments/{comment_id}",
    "POST /subscriptions",
    "GET /subscriptions",
    "DELETE /subscriptions/{author_id}",
];

pub async fn home() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to the Quill blog API",
        "endpoints": ENDPOINTS,
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
