//! Money display helpers.
//!
//! Prices are carried as [`rust_decimal::Decimal`] end to end; this module
//! only owns how they are shown to people.

use rust_decimal::Decimal;

/// Format an amount in Brazilian reais with two decimal places.
///
/// ```
/// use rust_decimal::Decimal;
/// use reis_core::format_brl;
///
/// assert_eq!(format_brl(Decimal::new(7050, 2)), "R$ 70.50");
/// assert_eq!(format_brl(Decimal::new(70, 0)), "R$ 70.00");
/// ```
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0.00");
        assert_eq!(format_brl(Decimal::new(6500, 2)), "R$ 65.00");
        assert_eq!(format_brl(Decimal::new(123_456, 2)), "R$ 1234.56");
    }

    #[test]
    fn test_format_brl_rounds_to_cents() {
        assert_eq!(format_brl(Decimal::new(70_006, 3)), "R$ 70.01");
    }
}
