//! KEHILA Auth — password authentication, session and JWT issuance and
//! validation, external-provider token verification, and the TTL-cached
//! tenant registry.

pub mod config;
pub mod error;
pub mod external;
pub mod password;
pub mod registry;
pub mod service;
pub mod token;
pub mod validator;

mod store;

pub use config::AuthConfig;
pub use error::AuthError;
pub use registry::TenantRegistry;
pub use service::{AuthService, LoginInput, LoginOutput};
pub use token::AccessTokenClaims;
pub use validator::{CredentialArtifacts, Validator};
