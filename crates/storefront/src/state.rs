//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::models::Product;

/// How long the catalog listing stays cached.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);

/// Cache key for catalog data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CatalogKey {
    /// The active-products home page listing.
    ActiveProducts,
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to the pool, the
/// configuration and the catalog cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog_cache: Cache<CatalogKey, Arc<Vec<Product>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog_cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the catalog cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &Cache<CatalogKey, Arc<Vec<Product>>> {
        &self.inner.catalog_cache
    }

    /// Drop cached catalog data (used after admin edits in dev setups).
    pub fn invalidate_catalog(&self) {
        self.inner.catalog_cache.invalidate_all();
    }
}
