//! Cart and checkout route handlers.
//!
//! The cart lives in the session; cart mutations are HTMX fragment
//! endpoints so the page updates without a full reload. Checkout validates
//! through [`crate::services::checkout`] and redirects to the order history
//! on success.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use reis_core::{PaymentMethod, ProductId, format_brl};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Cart, CartLine, session_keys, set_flash, take_flash};
use crate::services::checkout::{CheckoutForm, CheckoutService, minimum_order_total};
use crate::state::AppState;

// =============================================================================
// Display data
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_i32(),
            name: line.name.clone(),
            unit_price: format_brl(line.unit_price),
            quantity: line.quantity,
            line_price: format_brl(line.subtotal()),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub below_minimum: bool,
    pub minimum: String,
    pub shortfall: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let minimum = minimum_order_total();
        let below_minimum = !cart.is_empty() && subtotal < minimum;

        Self {
            items: cart.lines.iter().map(CartItemView::from).collect(),
            subtotal: format_brl(subtotal),
            item_count: cart.item_count(),
            below_minimum,
            minimum: format_brl(minimum),
            shortfall: format_brl((minimum - subtotal).max(rust_decimal::Decimal::ZERO)),
        }
    }
}

// =============================================================================
// Session helpers
// =============================================================================

/// Load the cart from the session (empty when absent).
async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart back into the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save cart: {e}")))
}

// =============================================================================
// Form types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Checkout form data (the delivery panel on the cart page).
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    pub delivery_address: String,
    pub phone: String,
    pub cpf: String,
    pub payment_method: String,
    pub notes: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Payment option for the checkout select.
pub struct PaymentOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub payment_options: Vec<PaymentOption>,
    pub flash: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn payment_options() -> Vec<PaymentOption> {
    PaymentMethod::ALL
        .iter()
        .map(|m| PaymentOption {
            value: m.as_str(),
            label: m.label(),
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page with the checkout form.
#[instrument(skip(session))]
pub async fn show(session: Session) -> CartShowTemplate {
    let cart = get_cart(&session).await;
    let flash = take_flash(&session).await;

    CartShowTemplate {
        cart: CartView::from(&cart),
        payment_options: payment_options(),
        flash,
    }
}

/// Add item to cart (HTMX).
///
/// The resulting line quantity is clamped to the product's stock and per-CPF
/// cap, like the product page selector. Returns the cart count fragment with
/// an HTMX trigger so the badge and cart page refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(form.product_id))
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound(format!("produto {}", form.product_id)))?;

    if !product.purchasable() {
        return Err(AppError::BadRequest(
            "Produto indisponível para compra".to_string(),
        ));
    }

    let max_quantity = u32::try_from(product.max_order_quantity()).unwrap_or(u32::MAX);
    let mut cart = get_cart(&session).await;
    cart.add(
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: form.quantity.unwrap_or(1).max(1),
        },
        max_quantity,
    );
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = get_cart(&session).await;
    cart.set_quantity(ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = get_cart(&session).await;
    cart.remove(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    let cart = get_cart(&session).await;
    CartCountTemplate {
        count: cart.item_count(),
    }
}

/// Validate and place the order.
///
/// On success the cart is cleared and the customer lands on the order
/// history. On a validation failure the specific message is flashed back to
/// the cart page; nothing is retried.
#[instrument(skip(state, session, user, form))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Response> {
    let cart = get_cart(&session).await;

    let checkout_form = CheckoutForm {
        delivery_address: &form.delivery_address,
        phone: &form.phone,
        cpf: &form.cpf,
        payment_method: &form.payment_method,
        notes: form.notes.as_deref(),
    };

    match CheckoutService::new(state.pool())
        .place_order(user.id, &cart, &checkout_form)
        .await
    {
        Ok(order_id) => {
            session
                .remove::<Cart>(session_keys::CART)
                .await
                .map_err(|e| AppError::Internal(format!("failed to clear cart: {e}")))?;
            set_flash(&session, &format!("Pedido #{order_id} realizado com sucesso!")).await;
            Ok(Redirect::to("/orders").into_response())
        }
        Err(err) => {
            if matches!(err, crate::services::checkout::CheckoutError::Repository(_)) {
                return Err(err.into());
            }
            tracing::info!(user_id = %user.id, error = %err, "checkout refused");
            set_flash(&session, &err.to_string()).await;
            Ok(Redirect::to("/cart").into_response())
        }
    }
}
