//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use kehila_auth::config::AuthConfig;
use kehila_auth::external::JwksVerifier;
use kehila_auth::registry::TenantRegistry;
use kehila_auth::service::AuthService;
use kehila_auth::validator::Validator;
use kehila_db::repository::{
    SurrealCredentialRepository, SurrealSessionRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use surrealdb::{Connection, Surreal};

/// Tenant registry cache TTL. Short so suspensions take effect quickly.
const TENANT_CACHE_TTL: Duration = Duration::from_secs(30);

type Auth<C> = AuthService<
    SurrealTenantRepository<C>,
    SurrealCredentialRepository<C>,
    SurrealUserRepository<C>,
    SurrealSessionRepository<C>,
>;

type ArtifactValidator<C> =
    Validator<SurrealUserRepository<C>, SurrealSessionRepository<C>, JwksVerifier>;

/// Application state shared across all request handlers.
pub struct AppState<C: Connection> {
    pub registry: TenantRegistry<SurrealTenantRepository<C>>,
    pub auth: Arc<Auth<C>>,
    pub validator: Arc<ArtifactValidator<C>>,
}

impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            auth: Arc::clone(&self.auth),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<C: Connection> AppState<C> {
    /// Wire up repositories, registry, service, and validator over one
    /// database handle.
    pub fn new(db: Surreal<C>, config: AuthConfig, external: Option<JwksVerifier>) -> Self {
        let registry = TenantRegistry::new(
            SurrealTenantRepository::new(db.clone()),
            TENANT_CACHE_TTL,
            config.store_timeout,
        );

        let credentials = match &config.pepper {
            Some(pepper) => SurrealCredentialRepository::with_pepper(db.clone(), pepper.clone()),
            None => SurrealCredentialRepository::new(db.clone()),
        };

        let auth = AuthService::new(
            registry.clone(),
            credentials,
            SurrealUserRepository::new(db.clone()),
            SurrealSessionRepository::new(db.clone()),
            config.clone(),
        );

        let validator = Validator::new(
            SurrealUserRepository::new(db.clone()),
            SurrealSessionRepository::new(db),
            external,
            config,
        );

        Self {
            registry,
            auth: Arc::new(auth),
            validator: Arc::new(validator),
        }
    }
}
