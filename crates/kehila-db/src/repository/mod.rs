//! SurrealDB implementations of the `kehila-core` repository traits.

mod credential;
mod session;
mod tenant;
mod user;

pub use credential::SurrealCredentialRepository;
pub use session::SurrealSessionRepository;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;
