//! User administration endpoints.

use axum::Json;
use axum::extract::{Path, State};
use kehila_core::guard;
use kehila_core::models::role::Role;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::HttpError;
use crate::extract::CurrentIdentity;
use crate::handlers::Ack;
use crate::state::AppState;

/// `POST /{tenant}/api/users/{user_id}/revoke-sessions` — forced logout
/// of every session a user holds. Manager only.
///
/// The revocation is scoped by the caller's validated tenant, not the
/// path, so a manager can never reach into another tenant.
pub async fn revoke_sessions<C: Connection>(
    State(state): State<AppState<C>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path((_tenant, user_id)): Path<(String, Uuid)>,
) -> Result<Json<Ack>, HttpError> {
    guard::require(&identity, &[Role::Manager])?;

    state
        .auth
        .revoke_all_sessions(identity.tenant_id, user_id)
        .await?;

    Ok(Json(Ack::ok()))
}
