//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Format a decimal amount as Brazilian reais.
///
/// Usage in templates: `{{ order.total|brl }}`
#[askama::filter_fn]
pub fn brl(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("R$ {value:.2}"))
}
