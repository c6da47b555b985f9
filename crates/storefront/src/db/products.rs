//! Catalog queries.

use sqlx::PgPool;

use reis_core::ProductId;

use super::RepositoryError;
use crate::models::{Product, ProductImage};

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All active products, newest first (the home page listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image_url, stock, cpf_limit, is_active, created_at
            FROM products
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Fetch one product by ID (active or not; the detail page decides).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image_url, stock, cpf_limit, is_active, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Gallery images for a product, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images(&self, id: ProductId) -> Result<Vec<ProductImage>, RepositoryError> {
        let images = sqlx::query_as::<_, ProductImage>(
            r"
            SELECT id, product_id, image_url, position
            FROM product_images
            WHERE product_id = $1
            ORDER BY position ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }
}
