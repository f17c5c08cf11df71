//! Role domain model and the fixed privilege hierarchy.
//!
//! Roles form a partial order, not independent flags: `Manager` subsumes
//! every role and `Staff` subsumes the non-privileged human roles. The
//! [`Role::satisfies`] table is the single place role comparison happens —
//! call sites must never compare role strings directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of privilege levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Staff,
    Instructor,
    Resident,
    Caregiver,
    /// Machine-to-machine identity; disjoint from the human hierarchy.
    Service,
}

impl Role {
    /// Whether a holder of `self` passes a check that requires `required`.
    ///
    /// Fixed lookup table: `Manager` satisfies everything, `Staff`
    /// additionally satisfies `Instructor`/`Resident`/`Caregiver`, every
    /// other role satisfies only itself.
    pub fn satisfies(self, required: Role) -> bool {
        match self {
            Role::Manager => true,
            Role::Staff => matches!(
                required,
                Role::Staff | Role::Instructor | Role::Resident | Role::Caregiver
            ),
            Role::Instructor | Role::Resident | Role::Caregiver | Role::Service => {
                self == required
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Instructor => "instructor",
            Role::Resident => "resident",
            Role::Caregiver => "caregiver",
            Role::Service => "service",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            "instructor" => Ok(Role::Instructor),
            "resident" => Ok(Role::Resident),
            "caregiver" => Ok(Role::Caregiver),
            "service" => Ok(Role::Service),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_satisfies_every_role() {
        for required in [
            Role::Manager,
            Role::Staff,
            Role::Instructor,
            Role::Resident,
            Role::Caregiver,
            Role::Service,
        ] {
            assert!(Role::Manager.satisfies(required));
        }
    }

    #[test]
    fn staff_satisfies_human_roles_but_not_manager_or_service() {
        assert!(Role::Staff.satisfies(Role::Staff));
        assert!(Role::Staff.satisfies(Role::Instructor));
        assert!(Role::Staff.satisfies(Role::Resident));
        assert!(Role::Staff.satisfies(Role::Caregiver));
        assert!(!Role::Staff.satisfies(Role::Manager));
        assert!(!Role::Staff.satisfies(Role::Service));
    }

    #[test]
    fn leaf_roles_satisfy_only_themselves() {
        assert!(Role::Resident.satisfies(Role::Resident));
        assert!(!Role::Resident.satisfies(Role::Staff));
        assert!(!Role::Resident.satisfies(Role::Caregiver));
        assert!(Role::Service.satisfies(Role::Service));
        assert!(!Role::Service.satisfies(Role::Resident));
    }

    #[test]
    fn role_string_roundtrip() {
        for role in [
            Role::Manager,
            Role::Staff,
            Role::Instructor,
            Role::Resident,
            Role::Caregiver,
            Role::Service,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }
}
