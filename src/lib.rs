pub mod auth;
pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod storage;

#[cfg(test)]
pub mod testing;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(content_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::{delete, post};
    use handlers::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/whoami", get(auth::whoami))
        .route("/auth/session", delete(auth::logout))
}

fn content_routes() -> Router {
    use axum::routing::post;
    use handlers::content;

    Router::new()
        // Batch save for the whole pending-change set
        .route("/content/batch", post(content::batch))
        // Table-level CRUD; the handler validates the table against the
        // allow-list before anything else
        .route(
            "/content/:table",
            get(content::list)
                .post(content::create)
                .patch(content::update)
                .delete(content::delete),
        )
}
