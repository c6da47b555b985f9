//! Checkout validation and order placement.
//!
//! Given the session cart and the delivery form, decide whether the order
//! may be submitted and, if so, write the order and its items. The
//! validation rules are pure functions so they can be tested without a
//! database; [`CheckoutService::place_order`] glues them to the queries.
//!
//! The per-CPF cap re-check and both inserts run inside one transaction,
//! with the product rows locked (`FOR UPDATE`) while the same-day quantity
//! is summed. Two concurrent submissions from the same CPF therefore
//! serialize instead of jointly exceeding the cap, and a failure at any
//! point leaves no partial order behind.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use reis_core::{Cpf, CpfError, OrderId, PaymentMethod, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::quantity_ordered_in_window;
use crate::models::Cart;

/// Minimum order subtotal, in centavos (R$ 70.00).
const MINIMUM_ORDER_CENTS: i64 = 7_000;

/// Minimum order subtotal as a decimal amount.
#[must_use]
pub fn minimum_order_total() -> Decimal {
    Decimal::new(MINIMUM_ORDER_CENTS, 2)
}

/// Why a checkout was refused.
///
/// Every variant carries a distinct customer-facing message; none of these
/// are retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("Carrinho vazio")]
    EmptyCart,

    /// The delivery address is missing.
    #[error("Informe o endereço de entrega")]
    MissingAddress,

    /// The contact phone is missing.
    #[error("Informe o telefone para contato")]
    MissingPhone,

    /// The CPF did not normalize to a valid identifier.
    #[error("CPF inválido: {0}")]
    InvalidCpf(#[from] CpfError),

    /// The payment method is not one of the fixed enumeration.
    #[error("Forma de pagamento inválida")]
    InvalidPaymentMethod,

    /// The subtotal is below the minimum order total.
    #[error("Pedido mínimo de R$ 70.00: faltam R$ {shortfall:.2}")]
    BelowMinimum {
        /// How much is missing to reach the minimum.
        shortfall: Decimal,
    },

    /// A product in the cart no longer exists or is inactive.
    #[error("Produto indisponível: {name}")]
    ProductUnavailable { name: String },

    /// A product is blocked for purchase (cap configured as zero).
    #[error("{name} está bloqueado para compra por CPF")]
    CapBlocked { name: String },

    /// The requested quantity would exceed the per-CPF daily cap.
    #[error("Limite por CPF excedido para {name}: máximo disponível: {remaining}")]
    CapExceeded {
        name: String,
        /// Units still allowed today for this CPF (cap minus prior orders).
        remaining: i64,
    },

    /// Not enough stock for the requested quantity.
    #[error("Estoque insuficiente para {name}: restam {available} unidade(s)")]
    InsufficientStock { name: String, available: i64 },

    /// Underlying database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The delivery form, as submitted.
#[derive(Debug)]
pub struct CheckoutForm<'a> {
    pub delivery_address: &'a str,
    pub phone: &'a str,
    pub cpf: &'a str,
    pub payment_method: &'a str,
    pub notes: Option<&'a str>,
}

/// Validated checkout input, ready for the transactional write.
#[derive(Debug)]
struct ValidatedCheckout {
    delivery_address: String,
    phone: String,
    cpf: Cpf,
    payment_method: PaymentMethod,
    notes: Option<String>,
    subtotal: Decimal,
}

/// Checkout service: validation plus the transactional order write.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Validate the cart and form, then write the order and its items in
    /// one transaction. Prices come from the cart snapshots, not from a
    /// re-fetch.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] encountered; nothing has been
    /// written unless the method returns `Ok`.
    pub async fn place_order(
        &self,
        user_id: UserId,
        cart: &Cart,
        form: &CheckoutForm<'_>,
    ) -> Result<OrderId, CheckoutError> {
        let validated = validate(cart, form)?;

        let (window_start, window_end) = same_day_window(Local::now());

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // Per-line cap and stock check against current data, under row locks.
        for line in &cart.lines {
            let product = lock_product(&mut tx, line.product_id).await?;

            let Some(product) = product else {
                return Err(CheckoutError::ProductUnavailable {
                    name: line.name.clone(),
                });
            };
            if !product.is_active {
                return Err(CheckoutError::ProductUnavailable { name: product.name });
            }

            let requested = i64::from(line.quantity);

            if i64::from(product.stock) < requested {
                return Err(CheckoutError::InsufficientStock {
                    name: product.name,
                    available: i64::from(product.stock),
                });
            }

            let prior = quantity_ordered_in_window(
                &mut *tx,
                validated.cpf.as_str(),
                line.product_id,
                window_start,
                window_end,
            )
            .await?;

            check_line_allowance(&product.name, product.cpf_limit, prior, requested)?;
        }

        let order_id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (user_id, total, payment_method, status, delivery_address, phone, cpf, notes)
            VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(validated.subtotal)
        .bind(validated.payment_method)
        .bind(&validated.delivery_address)
        .bind(&validated.phone)
        .bind(validated.cpf.as_str())
        .bind(validated.notes.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        for line in &cart.lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(i32::try_from(line.quantity).unwrap_or(i32::MAX))
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_id = %order_id,
            user_id = %user_id,
            total = %validated.subtotal,
            "order placed"
        );

        Ok(order_id)
    }
}

/// Row shape for the locked product read inside the checkout transaction.
#[derive(sqlx::FromRow)]
struct LockedProduct {
    name: String,
    stock: i32,
    cpf_limit: Option<i32>,
    is_active: bool,
}

/// Read one product under `FOR UPDATE` inside the checkout transaction.
async fn lock_product(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
) -> Result<Option<LockedProduct>, RepositoryError> {
    let product = sqlx::query_as::<_, LockedProduct>(
        r"
        SELECT name, stock, cpf_limit, is_active
        FROM products
        WHERE id = $1
        FOR UPDATE
        ",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(product)
}

// =============================================================================
// Pure validation rules
// =============================================================================

/// Run every read-only validation over the cart and form.
fn validate(cart: &Cart, form: &CheckoutForm<'_>) -> Result<ValidatedCheckout, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let delivery_address = form.delivery_address.trim();
    if delivery_address.is_empty() {
        return Err(CheckoutError::MissingAddress);
    }

    let phone: String = form.phone.chars().filter(char::is_ascii_digit).collect();
    if phone.is_empty() {
        return Err(CheckoutError::MissingPhone);
    }

    let cpf = Cpf::parse(form.cpf)?;

    let payment_method: PaymentMethod = form
        .payment_method
        .parse()
        .map_err(|_| CheckoutError::InvalidPaymentMethod)?;

    let subtotal = cart.subtotal();
    check_minimum(subtotal)?;

    Ok(ValidatedCheckout {
        delivery_address: delivery_address.to_string(),
        phone,
        cpf,
        payment_method,
        notes: form
            .notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from),
        subtotal,
    })
}

/// Enforce the minimum order subtotal, reporting the exact shortfall.
fn check_minimum(subtotal: Decimal) -> Result<(), CheckoutError> {
    let minimum = minimum_order_total();
    if subtotal < minimum {
        return Err(CheckoutError::BelowMinimum {
            shortfall: minimum - subtotal,
        });
    }
    Ok(())
}

/// Enforce the per-CPF daily cap for one cart line.
///
/// `cap` is the product's configured cap (`None` = unlimited, `Some(0)` =
/// blocked); `prior` is the quantity this CPF already ordered today across
/// non-cancelled orders. A request is accepted iff `prior + requested <= cap`.
fn check_line_allowance(
    name: &str,
    cap: Option<i32>,
    prior: i64,
    requested: i64,
) -> Result<(), CheckoutError> {
    let Some(cap) = cap else {
        return Ok(());
    };
    let cap = i64::from(cap);

    if cap == 0 {
        return Err(CheckoutError::CapBlocked {
            name: name.to_string(),
        });
    }

    if prior + requested > cap {
        return Err(CheckoutError::CapExceeded {
            name: name.to_string(),
            remaining: (cap - prior).max(0),
        });
    }

    Ok(())
}

/// The calendar-day window (server-local) containing `now`, as UTC bounds
/// for the `created_at` comparison.
fn same_day_window(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_else(|| now.naive_local());
    let start_local = Local
        .from_local_datetime(&day_start)
        .earliest()
        .unwrap_or(now);
    let start = start_local.with_timezone(&Utc);
    (start, start + Duration::days(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::CartLine;

    fn cart_with_subtotal(cents: i64) -> Cart {
        Cart {
            lines: vec![CartLine {
                product_id: ProductId::new(1),
                name: "Perfume importado".to_string(),
                unit_price: Decimal::new(cents, 2),
                quantity: 1,
            }],
        }
    }

    fn form<'a>() -> CheckoutForm<'a> {
        CheckoutForm {
            delivery_address: "Rua das Flores, 123, Centro",
            phone: "(11) 99999-9999",
            cpf: "529.982.247-25",
            payment_method: "cash",
            notes: None,
        }
    }

    // -- minimum order ------------------------------------------------------

    #[test]
    fn test_minimum_blocks_65_reporting_5_shortfall() {
        let err = check_minimum(Decimal::new(6_500, 2)).unwrap_err();
        match err {
            CheckoutError::BelowMinimum { shortfall } => {
                assert_eq!(shortfall, Decimal::new(500, 2));
            }
            other => panic!("expected BelowMinimum, got {other:?}"),
        }
    }

    #[test]
    fn test_minimum_accepts_exactly_70() {
        assert!(check_minimum(Decimal::new(7_000, 2)).is_ok());
        assert!(check_minimum(Decimal::new(7_001, 2)).is_ok());
    }

    // -- per-CPF cap --------------------------------------------------------

    #[test]
    fn test_cap_accepted_iff_within_allowance() {
        // cap 5, prior 3: request 2 fills the cap exactly
        assert!(check_line_allowance("p", Some(5), 3, 2).is_ok());
        // request 3 exceeds and reports remaining 2
        match check_line_allowance("p", Some(5), 3, 3).unwrap_err() {
            CheckoutError::CapExceeded { remaining, .. } => assert_eq!(remaining, 2),
            other => panic!("expected CapExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_cap_zero_rejects_everything() {
        assert!(matches!(
            check_line_allowance("p", Some(0), 0, 1).unwrap_err(),
            CheckoutError::CapBlocked { .. }
        ));
        assert!(matches!(
            check_line_allowance("p", Some(0), 7, 1).unwrap_err(),
            CheckoutError::CapBlocked { .. }
        ));
    }

    #[test]
    fn test_no_cap_accepts_any_quantity() {
        assert!(check_line_allowance("p", None, 0, 10_000).is_ok());
        assert!(check_line_allowance("p", None, 999, 10_000).is_ok());
    }

    #[test]
    fn test_cap_remaining_never_negative() {
        // Prior orders already above the cap (cap was lowered afterwards):
        // report zero remaining rather than a negative allowance.
        match check_line_allowance("p", Some(2), 5, 1).unwrap_err() {
            CheckoutError::CapExceeded { remaining, .. } => assert_eq!(remaining, 0),
            other => panic!("expected CapExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_cap_exceeded_message_names_allowance() {
        let err = check_line_allowance("Perfume importado", Some(5), 3, 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Perfume importado"), "{msg}");
        assert!(msg.contains("máximo disponível: 2"), "{msg}");
    }

    // -- form validation ----------------------------------------------------

    #[test]
    fn test_validate_empty_cart() {
        let cart = Cart::default();
        assert!(matches!(
            validate(&cart, &form()).unwrap_err(),
            CheckoutError::EmptyCart
        ));
    }

    #[test]
    fn test_validate_missing_address_and_phone() {
        let cart = cart_with_subtotal(7_000);
        let mut f = form();
        f.delivery_address = "   ";
        assert!(matches!(
            validate(&cart, &f).unwrap_err(),
            CheckoutError::MissingAddress
        ));

        let mut f = form();
        f.phone = "sem numero";
        assert!(matches!(
            validate(&cart, &f).unwrap_err(),
            CheckoutError::MissingPhone
        ));
    }

    #[test]
    fn test_validate_bad_cpf() {
        let cart = cart_with_subtotal(7_000);
        let mut f = form();
        f.cpf = "123";
        assert!(matches!(
            validate(&cart, &f).unwrap_err(),
            CheckoutError::InvalidCpf(_)
        ));
    }

    #[test]
    fn test_validate_bad_payment_method() {
        let cart = cart_with_subtotal(7_000);
        let mut f = form();
        f.payment_method = "boleto";
        assert!(matches!(
            validate(&cart, &f).unwrap_err(),
            CheckoutError::InvalidPaymentMethod
        ));
    }

    #[test]
    fn test_validate_below_minimum() {
        let cart = cart_with_subtotal(6_500);
        let err = validate(&cart, &form()).unwrap_err();
        assert!(err.to_string().contains("faltam R$ 5.00"), "{err}");
    }

    #[test]
    fn test_validate_success_normalizes() {
        let cart = cart_with_subtotal(7_000);
        let validated = validate(&cart, &form()).unwrap();
        assert_eq!(validated.phone, "11999999999");
        assert_eq!(validated.cpf.as_str(), "52998224725");
        assert_eq!(validated.payment_method, PaymentMethod::Cash);
        assert_eq!(validated.subtotal, Decimal::new(7_000, 2));
        assert!(validated.notes.is_none());
    }

    // -- day window ---------------------------------------------------------

    #[test]
    fn test_same_day_window_spans_24_hours() {
        let now = Local::now();
        let (start, end) = same_day_window(now);
        assert_eq!(end - start, Duration::days(1));
        let now_utc = now.with_timezone(&Utc);
        assert!(start <= now_utc && now_utc < end);
    }
}
