//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the small JSON API and stitches it with Leptos SSR
//! rendering under a single Axum router. Compiled WASM/JS/CSS is served from
//! the site root's `/pkg` directory.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use client::net::types::IdentityConfig;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared state for API handlers.
#[derive(Clone, Default)]
pub struct AppState {
    identity: Option<Arc<IdentityConfig>>,
}

impl AppState {
    pub fn new(identity: Option<IdentityConfig>) -> Self {
        Self { identity: identity.map(Arc::new) }
    }
}

/// API routes used by the browser app.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/config/identity", get(identity_config))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Leptos SSR frontend: API routes + Leptos SSR + static `/pkg` assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `Cargo.toml` `[package.metadata.leptos]` section).
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

/// Identity backend config for the browser SDK; 503 when not configured.
async fn identity_config(State(state): State<AppState>) -> Result<Json<IdentityConfig>, StatusCode> {
    state
        .identity
        .as_deref()
        .cloned()
        .map(Json)
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
