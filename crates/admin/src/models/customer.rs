//! Customer profile row type (back-office view of `users`).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use reis_core::UserId;

/// A registered customer as listed in the back office.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub cpf: Option<String>,
    pub address: Option<String>,
    pub rg_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CustomerProfile {
    /// Case-insensitive match against a free-text search: name substring, or
    /// digit substring of CPF or phone.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }

        if self.full_name.to_lowercase().contains(&q) {
            return true;
        }

        let q_digits: String = q.chars().filter(char::is_ascii_digit).collect();
        if q_digits.is_empty() {
            return false;
        }

        let cpf_digits: String = self
            .cpf
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let phone_digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();

        cpf_digits.contains(&q_digits) || phone_digits.contains(&q_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            id: UserId::new(1),
            email: "ana@example.com".to_string(),
            full_name: "Ana Beatriz Souza".to_string(),
            phone: "11988887777".to_string(),
            cpf: Some("52998224725".to_string()),
            address: None,
            rg_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        assert!(profile().matches("beatriz"));
        assert!(profile().matches("ANA"));
        assert!(!profile().matches("carlos"));
    }

    #[test]
    fn test_matches_cpf_and_phone_digits() {
        assert!(profile().matches("529.982"));
        assert!(profile().matches("(11) 98888"));
        assert!(!profile().matches("00000"));
    }

    #[test]
    fn test_empty_query_matches_everyone() {
        assert!(profile().matches("  "));
    }
}
