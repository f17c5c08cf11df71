//! Request-scoped identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// The resolved `(tenant, user, role)` triple attached to a request after
/// successful validation.
///
/// Constructed only by the validator — never from client-supplied headers —
/// and never persisted. Downstream data access must use `tenant_id` from
/// here, not from the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: Role,
}
