//! Authentication endpoints: login, logout, and session introspection.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use kehila_auth::service::LoginInput;
use kehila_core::models::identity::Identity;
use serde::Deserialize;
use surrealdb::Connection;

use crate::dispatch::{self, SESSION_COOKIE};
use crate::error::HttpError;
use crate::extract::CurrentIdentity;
use crate::handlers::Ack;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Phone number or email address.
    pub identifier: String,
    pub secret: String,
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `POST /{tenant}/api/auth/login` — the only unauthenticated route.
///
/// On success returns the session and access tokens, and additionally
/// sets the session cookie for browser clients.
pub async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    Path(tenant): Path<String>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Response, HttpError> {
    let output = state
        .auth
        .login(LoginInput {
            tenant_slug: tenant,
            identifier: body.identifier,
            secret: body.secret,
            ip_address: client_ip(&headers),
            user_agent: user_agent(&headers),
        })
        .await?;

    let max_age = (output.expires_at - Utc::now()).num_seconds().max(0);
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
        output.session_token
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(output)).into_response())
}

/// `POST /{tenant}/api/auth/logout` — idempotent; clears the session
/// cookie either way.
pub async fn logout<C: Connection>(
    State(state): State<AppState<C>>,
    CurrentIdentity(identity): CurrentIdentity,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    if let Some(raw_token) = dispatch::session_token(&headers) {
        state.auth.logout(identity.tenant_id, &raw_token).await?;
    }

    let clear = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    Ok(([(header::SET_COOKIE, clear)], Json(Ack::ok())).into_response())
}

/// `GET /{tenant}/api/auth/session` — who am I, as resolved by the
/// dispatcher.
pub async fn session(CurrentIdentity(identity): CurrentIdentity) -> Json<Identity> {
    Json(identity)
}
