//! Product CRUD queries for the back office.

use rust_decimal::Decimal;
use sqlx::PgPool;

use reis_core::{ProductId, ProductImageId};

use super::RepositoryError;
use crate::models::{Product, ProductImage};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image_url, stock, cpf_limit, is_active, created_at, updated_at";

/// Fields of the product create/edit form.
#[derive(Debug)]
pub struct ProductInput<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Decimal,
    pub stock: i32,
    pub cpf_limit: Option<i32>,
    pub is_active: bool,
}

/// Repository for back-office product operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, newest first (active or not).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product; `image_url` may be filled in later by the upload.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &ProductInput<'_>,
        image_url: Option<&str>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products (name, description, price, image_url, stock, cpf_limit, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(image_url)
        .bind(input.stock)
        .bind(input.cpf_limit)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Update a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput<'_>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5,
                cpf_limit = $6, is_active = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.cpf_limit)
        .bind(input.is_active)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Replace a product's main image URL (`None` clears it).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_image(
        &self,
        id: ProductId,
        image_url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET image_url = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(image_url)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Delete a product. Fails if order lines reference it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product has been ordered.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => {
                    RepositoryError::Conflict(
                        "produto já possui pedidos; desative em vez de excluir".to_string(),
                    )
                }
                _ => RepositoryError::Database(e),
            })?;

        Ok(())
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

    /// Append a gallery image after the current last position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add_image(&self, id: ProductId, image_url: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_images (product_id, image_url, position)
            SELECT $1, $2, COALESCE(MAX(position) + 1, 0)
            FROM product_images WHERE product_id = $1
            ",
        )
        .bind(id)
        .bind(image_url)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove one gallery image, returning its URL so the file can be
    /// deleted too.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_image(
        &self,
        image_id: ProductImageId,
    ) -> Result<Option<String>, RepositoryError> {
        let url: Option<String> =
            sqlx::query_scalar("DELETE FROM product_images WHERE id = $1 RETURNING image_url")
                .bind(image_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(url)
    }
}
