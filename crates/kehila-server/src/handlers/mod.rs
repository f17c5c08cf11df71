//! HTTP request handlers.

pub mod auth;
pub mod users;

use serde::Serialize;

/// Minimal acknowledgement body for side-effect-only endpoints.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
}

impl Ack {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
