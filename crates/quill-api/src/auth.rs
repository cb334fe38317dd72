use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use quill_auth::{CredentialHasher, TokenIssuer};
use quill_db::Database;
use quill_types::api::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse, UserSummary,
};

use crate::error::DomainError;
use crate::extract::IdPath;
use crate::service::{run_blocking, users};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenIssuer,
    pub hasher: CredentialHasher,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let user = run_blocking(&state, move |s| users::register(s, &req.email, &req.password)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserSummary {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

/// Returns the token in the body and mirrors it in the `Authorization` header.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let (user, token) =
        run_blocking(&state, move |s| users::login(s, &req.email, &req.password)).await?;

    Ok((
        [(header::AUTHORIZATION, format!("Bearer {}", token))],
        Json(LoginResponse {
            message: "Logged in".into(),
            user_id: user.id,
            token,
        }),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    IdPath(user_id): IdPath<i64>,
) -> Result<impl IntoResponse, DomainError> {
    let user = run_blocking(&state, move |s| users::get_user(&s.db, user_id)).await?;
    Ok(Json(UserResponse { user }))
}
