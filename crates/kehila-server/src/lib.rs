//! KEHILA Server — HTTP surface over the authentication core.
//!
//! Route layout per tenant: `/{tenant}/api/...`. Login is the only
//! unauthenticated route; everything else sits behind the dispatcher
//! middleware, which resolves the tenant, validates the credential
//! artifacts, and attaches the resolved identity before any handler
//! runs.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use surrealdb::Connection;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use state::AppState;

async fn healthz() -> &'static str {
    "ok"
}

/// Build the application router.
pub fn router<C: Connection>(state: AppState<C>) -> Router {
    let protected = Router::new()
        .route("/{tenant}/api/auth/logout", post(handlers::auth::logout::<C>))
        .route("/{tenant}/api/auth/session", get(handlers::auth::session))
        .route(
            "/{tenant}/api/users/{user_id}/revoke-sessions",
            post(handlers::users::revoke_sessions::<C>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            dispatch::dispatch::<C>,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/{tenant}/api/auth/login", post(handlers::auth::login::<C>))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
