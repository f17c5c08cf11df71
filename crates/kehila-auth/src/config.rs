//! Authentication configuration.

use std::time::Duration;

/// Configuration for the authentication service and validator.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for JWT signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for JWT verification.
    pub jwt_public_key_pem: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Access token lifetime in seconds (default: 900 = 15 minutes).
    pub access_token_lifetime_secs: u64,
    /// Session lifetime in seconds (default: 28_800 = 8 hours).
    pub session_lifetime_secs: u64,
    /// A session validated with less than this many seconds remaining is
    /// extended by a full lifetime (sliding refresh). 0 disables refresh.
    pub session_refresh_threshold_secs: u64,
    /// Optional pepper prepended to secrets before Argon2id verification.
    pub pepper: Option<String>,
    /// Deadline for any single credential/session store call. Exceeding
    /// it fails the request closed, never open.
    pub store_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            jwt_issuer: "kehila".into(),
            access_token_lifetime_secs: 900,
            session_lifetime_secs: 28_800,
            session_refresh_threshold_secs: 3_600,
            pepper: None,
            store_timeout: Duration::from_secs(3),
        }
    }
}
