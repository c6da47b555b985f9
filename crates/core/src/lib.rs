//! Reis Imports Core - Shared domain types.
//!
//! This crate provides the common types used across all Reis Imports
//! components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout, orders)
//! - `admin` - Internal back office (order workflow, products, finance)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, CPF, email, money and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
