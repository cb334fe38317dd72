use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use quill_types::api::{CommentListResponse, CommentRequest, CommentResponse};
use quill_types::models::Identity;

use crate::auth::AppState;
use crate::error::DomainError;
use crate::extract::IdPath;
use crate::service::{comments, run_blocking};

pub async fn list_comments(
    State(state): State<AppState>,
    IdPath(post_id): IdPath<i64>,
) -> Result<impl IntoResponse, DomainError> {
    let comments = run_blocking(&state, move |s| comments::list_comments(&s.db, post_id)).await?;
    Ok(Json(CommentListResponse { comments }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    IdPath(post_id): IdPath<i64>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let comment = run_blocking(&state, move |s| {
        comments::create_comment(&s.db, &identity, post_id, &req.content)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

pub async fn update_comment(
    State(state): State<AppState>,
    IdPath((post_id, comment_id)): IdPath<(i64, i64)>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let comment = run_blocking(&state, move |s| {
        comments::update_comment(&s.db, &identity, post_id, comment_id, &req.content)
    })
    .await?;
    Ok(Json(CommentResponse { comment }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    IdPath((post_id, comment_id)): IdPath<(i64, i64)>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, DomainError> {
    run_blocking(&state, move |s| {
        comments::delete_comment(&s.db, &identity, post_id, comment_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
