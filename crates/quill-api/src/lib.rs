pub mod auth;
pub mod comments;
pub mod error;
pub mod extract;
pub mod fields;
pub mod index;
pub mod middleware;
pub mod posts;
pub mod service;
pub mod subscriptions;
pub mod validation;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// Build the full route table. Reads are public; every mutation and the
/// subscription list sit behind [`require_auth`].
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(index::home))
        .route("/health", get(index::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users/{user_id}", get(auth::get_user))
        .route("/posts", get(posts::list_posts))
        .route("/posts/{post_id}", get(posts::get_post))
        .route("/posts/{post_id}/comments", get(comments::list_comments));

    let protected_routes = Router::new()
        .route("/posts", post(posts::create_post))
        .route(
            "/posts/{post_id}",
            patch(posts::update_post).delete(posts::delete_post),
        )
        .route("/posts/{post_id}/comments", post(comments::create_comment))
        .route(
            "/posts/{post_id}/comments/{comment_id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/subscriptions",
            post(subscriptions::create_subscription).get(subscriptions::list_subscriptions),
        )
        .route(
            "/subscriptions/{author_id}",
            delete(subscriptions::delete_subscription),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
