//! Holocron server library logic.
//!
//! Routing, shared state, and the handler modules for the catalog-favorites
//! REST API. The binary in `main.rs` wires this router to a TCP listener;
//! integration tests drive it directly with `tower::ServiceExt`.

pub mod api;
pub mod api_catalog;
pub mod api_favorites;
pub mod api_users;
pub mod config;

use axum::{
    response::Html,
    routing::{get, post},
    Extension, Json, Router,
};
use holocron_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Every route the server exposes, in registration order. The sitemap at
/// `/` is rendered from this table; `app` below registers the same paths,
/// one line apart, so the listing cannot silently go stale.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/health"),
    ("POST", "/user"),
    ("GET", "/users"),
    ("GET", "/usuarios/{id}"),
    ("GET", "/people"),
    ("POST", "/people"),
    ("GET", "/people/{id}"),
    ("GET", "/planets"),
    ("POST", "/planets"),
    ("GET", "/planets/{id}"),
    ("POST", "/favorite/planet/{planet_id}"),
    ("DELETE", "/favorite/planet/{planet_id}"),
    ("POST", "/favorite/people/{people_id}"),
    ("DELETE", "/favorite/people/{people_id}"),
];

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load
/// balancers, monitoring, and CI to verify the server is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Sitemap handler: an HTML listing of every registered route, served at
/// the root path. Parameterless GET routes are rendered as links.
async fn sitemap() -> Html<String> {
    let mut items = String::new();
    for (method, path) in ROUTES {
        if *method == "GET" && !path.contains('{') {
            items.push_str(&format!(
                "  <li>{method} <a href=\"{path}\">{path}</a></li>\n"
            ));
        } else {
            items.push_str(&format!("  <li>{method} {path}</li>\n"));
        }
    }
    Html(format!(
        "<h1>Holocron API</h1>\n<p>Available routes:</p>\n<ul>\n{items}</ul>\n"
    ))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(sitemap))
        .route("/health", get(health))
        .route("/user", post(api_users::create_user_handler))
        .route("/users", get(api_users::list_users_handler))
        .route("/usuarios/{id}", get(api_users::get_user_handler))
        .route(
            "/people",
            get(api_catalog::list_characters_handler)
                .post(api_catalog::create_character_handler),
        )
        .route("/people/{id}", get(api_catalog::get_character_handler))
        .route(
            "/planets",
            get(api_catalog::list_planets_handler).post(api_catalog::create_planet_handler),
        )
        .route("/planets/{id}", get(api_catalog::get_planet_handler))
        .route(
            "/favorite/planet/{planet_id}",
            post(api_favorites::add_favorite_planet_handler)
                .delete(api_favorites::remove_favorite_planet_handler),
        )
        .route(
            "/favorite/people/{people_id}",
            post(api_favorites::add_favorite_character_handler)
                .delete(api_favorites::remove_favorite_character_handler),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sitemap_lists_every_route() {
        let Html(body) = sitemap().await;
        for (method, path) in ROUTES {
            assert!(
                body.contains(&format!("{method} ")) && body.contains(*path),
                "sitemap should mention {method} {path}"
            );
        }
    }

    #[tokio::test]
    async fn sitemap_links_plain_get_routes() {
        let Html(body) = sitemap().await;
        assert!(body.contains("<a href=\"/planets\">"));
        assert!(
            !body.contains("<a href=\"/planets/{id}\">"),
            "parameterized routes must not be rendered as links"
        );
    }
}
