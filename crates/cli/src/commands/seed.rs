//! Demo catalog seeding for development environments.

use rust_decimal::Decimal;

use super::{CommandError, connect};

/// A demo product row.
struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    stock: i32,
    cpf_limit: Option<i32>,
}

fn seed_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Perfume importado 100ml",
            description: "Fragrância premium importada, lacrada de fábrica.",
            price: Decimal::new(18_990, 2),
            stock: 25,
            cpf_limit: Some(2),
        },
        SeedProduct {
            name: "Relógio esportivo",
            description: "Relógio resistente à água com pulseira de aço.",
            price: Decimal::new(24_900, 2),
            stock: 12,
            cpf_limit: None,
        },
        SeedProduct {
            name: "Fone bluetooth",
            description: "Fone sem fio com estojo de recarga.",
            price: Decimal::new(8_990, 2),
            stock: 40,
            cpf_limit: Some(5),
        },
        SeedProduct {
            name: "Óculos de sol",
            description: "Proteção UV400, armação leve.",
            price: Decimal::new(7_450, 2),
            stock: 8,
            cpf_limit: None,
        },
    ]
}

/// Insert demo products. Safe to run on an empty database only.
///
/// # Errors
///
/// Returns `CommandError::Database` on query failures.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        tracing::warn!("products table is not empty ({existing} rows); skipping seed");
        return Ok(());
    }

    for product in seed_products() {
        sqlx::query(
            r"
            INSERT INTO products (name, description, price, stock, cpf_limit, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.cpf_limit)
        .execute(&pool)
        .await?;
    }

    tracing::info!("Seeded {} demo products", seed_products().len());
    Ok(())
}
