//! Social feed backend.
//!
//! An in-memory repository of posts, comments, likes, tag subscriptions,
//! follows, profiles, boards and direct messages, persisted as JSON
//! snapshots and served over a small REST API.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let admin_key = state.config.admin_key.clone();

    let app_routes = Router::new()
        // Posts
        .route("/posts", get(api::list_posts).post(api::create_post))
        .route("/posts/query", post(api::query_posts))
        .route("/posts/{id}", put(api::update_post).delete(api::delete_post))
        .route("/posts/{id}/like", post(api::like_post))
        .route("/posts/{id}/comments", post(api::comment_post))
        // Me
        .route("/me", get(api::get_me).patch(api::patch_me))
        .route("/me/tags", get(api::get_my_tags).post(api::add_my_tag))
        .route("/me/tags/{tag}", delete(api::remove_my_tag))
        .route("/me/friends", get(api::get_my_friends))
        // Users
        .route("/users/{id}", get(api::get_user))
        .route("/users/{id}/posts", get(api::get_user_posts))
        .route(
            "/users/{id}/follow",
            post(api::follow_user).delete(api::unfollow_user),
        )
        // Boards
        .route("/boards", get(api::list_boards).post(api::create_board))
        .route("/boards/{id}", get(api::get_board).patch(api::update_board))
        .route("/boards/{id}/posts", get(api::list_board_posts))
        // Direct messages
        .route(
            "/conversations",
            get(api::list_conversations).post(api::create_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            get(api::list_messages).post(api::send_message),
        )
        // Library
        .route("/api/v1/library/sync", post(api::sync_library))
        .layer(middleware::from_fn(auth::identity_layer));

    let admin_routes = Router::new()
        .route("/admin/reload", post(api::reload))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_key_layer(admin_key.clone(), req, next)
        }));

    // Health check (no identity required)
    let health_routes = Router::new().route("/healthz", get(health_check));

    Router::new()
        .merge(app_routes)
        .merge(admin_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
