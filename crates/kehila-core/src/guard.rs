//! Authorization guard.
//!
//! The single choke point for role checks. Handlers call [`require`] with
//! the validated identity and the set of roles the operation admits; the
//! privilege rules themselves live in the [`Role::satisfies`] table.

use crate::error::{KehilaError, KehilaResult};
use crate::models::identity::Identity;
use crate::models::role::Role;

/// Permit the operation if the identity's role satisfies any of the
/// allowed roles; `Forbidden` otherwise.
///
/// Pure function — no I/O, no logging. A check written as
/// `require(&identity, &[Role::Staff])` admits managers too, because the
/// hierarchy is consulted, not string equality.
pub fn require(identity: &Identity, allowed: &[Role]) -> KehilaResult<()> {
    if allowed.iter().any(|role| identity.role.satisfies(*role)) {
        Ok(())
    } else {
        Err(KehilaError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn staff_check_admits_manager_and_staff() {
        assert!(require(&identity(Role::Manager), &[Role::Staff]).is_ok());
        assert!(require(&identity(Role::Staff), &[Role::Staff]).is_ok());
    }

    #[test]
    fn staff_check_rejects_resident() {
        let err = require(&identity(Role::Resident), &[Role::Manager, Role::Staff]).unwrap_err();
        assert!(matches!(err, KehilaError::Forbidden));
    }

    #[test]
    fn multi_role_check_passes_on_any_match() {
        assert!(require(&identity(Role::Caregiver), &[Role::Resident, Role::Caregiver]).is_ok());
    }

    #[test]
    fn empty_allowed_set_rejects_everyone() {
        let err = require(&identity(Role::Manager), &[]).unwrap_err();
        assert!(matches!(err, KehilaError::Forbidden));
    }
}
