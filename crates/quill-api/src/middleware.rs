use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{debug, warn};

use crate::auth::AppState;
use crate::error::{DomainError, UnauthorizedKind};
use crate::service::{run_blocking, users};

const UNAUTHORIZED: DomainError = DomainError::Unauthorized(UnauthorizedKind::InvalidToken);

/// Resolve the bearer token to a live [`Identity`](quill_types::models::Identity)
/// and attach it to the request.
///
/// - no `Authorization` header, or not a bearer credential: 401
/// - bad signature, wrong algorithm or expired: 401
/// - token subject no longer exists: 401
/// - user lookup fails: 500
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, DomainError> {
    let bearer = match req.headers().typed_try_get::<Authorization<Bearer>>() {
        Ok(Some(header)) => header,
        Ok(None) => {
            debug!("Request to {} without bearer token", req.uri().path());
            return Err(UNAUTHORIZED);
        }
        Err(e) => {
            warn!("Malformed Authorization header: {}", e);
            return Err(UNAUTHORIZED);
        }
    };

    let user_id = state.tokens.verify(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        UNAUTHORIZED
    })?;

    let identity = run_blocking(&state, move |s| users::resolve_identity(&s.db, user_id)).await?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
