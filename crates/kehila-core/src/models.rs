//! Domain models for KEHILA.
//!
//! These are the core types shared across all crates.

pub mod credential;
pub mod identity;
pub mod role;
pub mod session;
pub mod tenant;
pub mod user;
