//! Tenant registry — slug resolution with a bounded-TTL in-process cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kehila_core::error::{KehilaError, KehilaResult};
use kehila_core::models::tenant::{Tenant, TenantStatus};
use kehila_core::repository::TenantRepository;
use parking_lot::RwLock;
use tracing::debug;

struct CachedTenant {
    tenant: Tenant,
    fetched_at: Instant,
}

/// Resolves a routable tenant slug to its registry entry.
///
/// Lookups are pure; a short-TTL cache in front of the store avoids a
/// round trip per request. Status is checked on every resolve, so a
/// suspension takes effect as soon as the cached record ages out.
pub struct TenantRegistry<T: TenantRepository> {
    repo: T,
    cache: Arc<RwLock<HashMap<String, CachedTenant>>>,
    ttl: Duration,
    store_timeout: Duration,
}

impl<T: TenantRepository + Clone> Clone for TenantRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
            store_timeout: self.store_timeout,
        }
    }
}

impl<T: TenantRepository> TenantRegistry<T> {
    pub fn new(repo: T, ttl: Duration, store_timeout: Duration) -> Self {
        Self {
            repo,
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            store_timeout,
        }
    }

    /// Look up a tenant by slug.
    ///
    /// Fails with `TenantNotFound` when the slug is unknown and
    /// `TenantSuspended` when the tenant exists but is inactive.
    pub async fn resolve(&self, slug: &str) -> KehilaResult<Tenant> {
        if let Some(tenant) = self.cached(slug) {
            return Self::check_status(tenant);
        }

        let tenant = crate::store::with_deadline(self.store_timeout, self.repo.get_by_slug(slug))
            .await
            .map_err(|e| match e {
                KehilaError::NotFound { .. } => KehilaError::TenantNotFound { slug: slug.into() },
                other => other,
            })?;

        debug!(tenant = %tenant.slug, "tenant registry cache fill");
        self.cache.write().insert(
            slug.to_string(),
            CachedTenant {
                tenant: tenant.clone(),
                fetched_at: Instant::now(),
            },
        );

        Self::check_status(tenant)
    }

    fn cached(&self, slug: &str) -> Option<Tenant> {
        let cache = self.cache.read();
        let entry = cache.get(slug)?;
        if entry.fetched_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.tenant.clone())
    }

    fn check_status(tenant: Tenant) -> KehilaResult<Tenant> {
        match tenant.status {
            TenantStatus::Active => Ok(tenant),
            TenantStatus::Suspended => Err(KehilaError::TenantSuspended {
                slug: tenant.slug.clone(),
            }),
        }
    }
}
