//! Authentication error types.

use kehila_core::error::KehilaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session invalid")]
    SessionInvalid,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("external provider verification failed: {0}")]
    ExternalProvider(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for KehilaError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => KehilaError::InvalidCredentials,
            AuthError::SessionInvalid => KehilaError::SessionInvalid,
            AuthError::TokenExpired => KehilaError::TokenInvalid("token has expired".into()),
            AuthError::TokenInvalid(msg) | AuthError::ExternalProvider(msg) => {
                KehilaError::TokenInvalid(msg)
            }
            AuthError::Crypto(msg) => KehilaError::Crypto(msg),
        }
    }
}
