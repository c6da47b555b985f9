//! Domain models for the storefront.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine};
pub use order::{Order, OrderItemDetail};
pub use product::{Product, ProductImage};
pub use session::{CurrentUser, session_keys, set_flash, take_flash};
pub use user::User;
