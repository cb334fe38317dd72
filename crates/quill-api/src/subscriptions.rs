use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use quill_types::api::{CreateSubscriptionRequest, SubscriptionListResponse};
use quill_types::models::Identity;

use crate::auth::AppState;
use crate::error::DomainError;
use crate::extract::IdPath;
use crate::service::{run_blocking, subscriptions};

pub async fn create_subscription(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let author_id = req.author_id;
    run_blocking(&state, move |s| {
        subscriptions::create_subscription(&s.db, identity.id, author_id)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Subscription created", "author_id": author_id })),
    ))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, DomainError> {
    let subscriptions = run_blocking(&state, move |s| {
        subscriptions::list_subscriptions(&s.db, identity.id)
    })
    .await?;
    Ok(Json(SubscriptionListResponse { subscriptions }))
}

pub async fn delete_subscription(
    State(state): State<AppState>,
    IdPath(author_id): IdPath<i64>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, DomainError> {
    run_blocking(&state, move |s| {
        subscriptions::delete_subscription(&s.db, identity.id, author_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
