//! WhatsApp deep links.
//!
//! The back office contacts customers through `wa.me` links; composing the
//! link is the only messaging the system does.

/// Build a `wa.me` deep link for a phone and prefilled message.
///
/// Non-digits are stripped from the phone; the country code is prepended
/// only when the number doesn't already carry it.
#[must_use]
pub fn link(country_code: &str, phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let full = if digits.starts_with(country_code) && digits.len() > 11 {
        digits
    } else {
        format!("{country_code}{digits}")
    };
    format!("https://wa.me/{full}?text={}", urlencoding::encode(message))
}

/// The standard greeting about an order.
#[must_use]
pub fn order_greeting(customer_name: &str, order_reference: &str) -> String {
    format!("Olá {customer_name}! Sobre seu pedido {order_reference} na Reis Imports...")
}

/// The standard generic greeting (customer management).
#[must_use]
pub fn contact_greeting(customer_name: &str) -> String {
    format!("Olá {customer_name}! Podemos ajudar?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_strips_formatting() {
        let url = link("55", "(11) 99999-9999", "Olá!");
        assert_eq!(url, "https://wa.me/5511999999999?text=Ol%C3%A1%21");
    }

    #[test]
    fn test_link_keeps_existing_country_code() {
        let url = link("55", "5511999999999", "oi");
        assert!(url.starts_with("https://wa.me/5511999999999?"));
    }

    #[test]
    fn test_order_greeting_mentions_reference() {
        let msg = order_greeting("Ana", "#000042");
        assert!(msg.contains("Ana"));
        assert!(msg.contains("#000042"));
    }
}
