//! KEHILA Core — domain models, repository trait definitions, the error
//! taxonomy, and the authorization guard.
//!
//! This crate has no I/O dependencies; persistence and HTTP layers build
//! on the traits and types defined here.

pub mod error;
pub mod guard;
pub mod models;
pub mod repository;

pub use error::{KehilaError, KehilaResult};
