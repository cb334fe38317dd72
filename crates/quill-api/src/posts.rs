use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use quill_types::api::{CreatePostRequest, PostListQuery, PostResponse, UpdatePostRequest};
use quill_types::models::Identity;

use crate::auth::AppState;
use crate::error::DomainError;
use crate::extract::IdPath;
use crate::fields::{parse_fields, project};
use crate::service::{posts, run_blocking};

/// GET /posts, optionally narrowed with `?fields=id,title`.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Response, DomainError> {
    let fields = match query.fields.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_fields(raw)?),
        _ => None,
    };

    let posts = run_blocking(&state, |s| posts::list_posts(&s.db)).await?;

    let body = match fields {
        Some(fields) => json!({ "posts": project(&posts, &fields) }),
        None => json!({ "posts": posts }),
    };
    Ok(Json(body).into_response())
}

pub async fn get_post(
    State(state): State<AppState>,
    IdPath(post_id): IdPath<i64>,
) -> Result<impl IntoResponse, DomainError> {
    let post = run_blocking(&state, move |s| posts::get_post(&s.db, post_id)).await?;
    Ok(Json(PostResponse { post }))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let post = run_blocking(&state, move |s| {
        posts::create_post(&s.db, &identity, &req.title, &req.content)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}

pub async fn update_post(
    State(state): State<AppState>,
    IdPath(post_id): IdPath<i64>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let post = run_blocking(&state, move |s| {
        posts::update_post(&s.db, &identity, post_id, &req.title, &req.content)
    })
    .await?;
    Ok(Json(PostResponse { post }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    IdPath(post_id): IdPath<i64>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, DomainError> {
    run_blocking(&state, move |s| posts::delete_post(&s.db, &identity, post_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
