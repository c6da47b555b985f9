//! CPF (Cadastro de Pessoas Físicas) tax identifier type.
//!
//! A CPF is the Brazilian natural-person tax number: eleven digits, the last
//! two of which are check digits. Orders carry a CPF snapshot and the per-CPF
//! purchase cap is keyed on it, so the type normalizes and validates once at
//! the boundary and the rest of the system can trust the value.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cpf`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CpfError {
    /// The input string is empty.
    #[error("CPF cannot be empty")]
    Empty,
    /// The input does not normalize to exactly 11 digits.
    #[error("CPF must have exactly 11 digits (got {got})")]
    WrongLength {
        /// Number of digits after stripping formatting.
        got: usize,
    },
    /// All eleven digits are identical (e.g. 111.111.111-11), which the
    /// check-digit scheme would otherwise accept.
    #[error("CPF digits cannot all be identical")]
    RepeatedDigits,
    /// One of the two check digits does not match.
    #[error("CPF check digits are invalid")]
    InvalidCheckDigits,
}

/// A validated CPF, stored as its 11 normalized digits.
///
/// Parsing accepts any formatting (`529.982.247-25`, `52998224725`, ...);
/// everything that is not an ASCII digit is stripped before validation.
///
/// # Examples
///
/// ```
/// use reis_core::Cpf;
///
/// let cpf = Cpf::parse("529.982.247-25").unwrap();
/// assert_eq!(cpf.as_str(), "52998224725");
/// assert_eq!(cpf.formatted(), "529.982.247-25");
///
/// assert!(Cpf::parse("111.111.111-11").is_err()); // repeated digits
/// assert!(Cpf::parse("529.982.247-20").is_err()); // bad check digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Parse a `Cpf` from a string, stripping formatting characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, does not contain exactly 11
    /// digits, has all-identical digits, or fails check-digit verification.
    pub fn parse(s: &str) -> Result<Self, CpfError> {
        if s.trim().is_empty() {
            return Err(CpfError::Empty);
        }

        let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

        if digits.len() != 11 {
            return Err(CpfError::WrongLength { got: digits.len() });
        }

        if digits.iter().all(|&d| d == digits[0]) {
            return Err(CpfError::RepeatedDigits);
        }

        if check_digit(&digits[..9], 10) != digits[9]
            || check_digit(&digits[..10], 11) != digits[10]
        {
            return Err(CpfError::InvalidCheckDigits);
        }

        let normalized: String = digits
            .iter()
            .map(|d| char::from_digit(*d, 10).unwrap_or('0'))
            .collect();

        Ok(Self(normalized))
    }

    /// Returns the 11 normalized digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Cpf` and returns its inner digit string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the CPF formatted as `000.000.000-00` for display.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}-{}",
            &self.0[0..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..11]
        )
    }
}

/// Compute a CPF check digit over `digits` with the given starting weight.
///
/// The first check digit weighs the nine base digits 10..2, the second weighs
/// the first ten digits 11..2; in both cases `(sum * 10) % 11` with 10
/// mapping to 0.
fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    let digit = (sum * 10) % 11;
    if digit == 10 { 0 } else { digit }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cpf {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cpf {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed already normalized
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cpf {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formatted() {
        let cpf = Cpf::parse("529.982.247-25").unwrap();
        assert_eq!(cpf.as_str(), "52998224725");
    }

    #[test]
    fn test_parse_bare_digits() {
        let cpf = Cpf::parse("52998224725").unwrap();
        assert_eq!(cpf.as_str(), "52998224725");
    }

    #[test]
    fn test_parse_with_spaces() {
        let cpf = Cpf::parse(" 529 982 247 25 ").unwrap();
        assert_eq!(cpf.as_str(), "52998224725");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Cpf::parse(""), Err(CpfError::Empty));
        assert_eq!(Cpf::parse("   "), Err(CpfError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            Cpf::parse("1234567890"),
            Err(CpfError::WrongLength { got: 10 })
        );
        assert_eq!(
            Cpf::parse("123456789012"),
            Err(CpfError::WrongLength { got: 12 })
        );
    }

    #[test]
    fn test_parse_repeated_digits() {
        assert_eq!(Cpf::parse("111.111.111-11"), Err(CpfError::RepeatedDigits));
        assert_eq!(Cpf::parse("00000000000"), Err(CpfError::RepeatedDigits));
    }

    #[test]
    fn test_parse_bad_check_digits() {
        assert_eq!(
            Cpf::parse("529.982.247-24"),
            Err(CpfError::InvalidCheckDigits)
        );
        assert_eq!(
            Cpf::parse("529.982.247-35"),
            Err(CpfError::InvalidCheckDigits)
        );
    }

    #[test]
    fn test_check_digit_maps_ten_to_zero() {
        // For 100.000.001-08 the first check-digit sum is 12, so
        // (12 * 10) % 11 == 10, which the scheme maps to 0.
        let cpf = Cpf::parse("100.000.001-08").unwrap();
        assert_eq!(cpf.as_str(), "10000000108");
    }

    #[test]
    fn test_formatted() {
        let cpf = Cpf::parse("52998224725").unwrap();
        assert_eq!(cpf.formatted(), "529.982.247-25");
        assert_eq!(cpf.to_string(), "529.982.247-25");
    }

    #[test]
    fn test_from_str() {
        let cpf: Cpf = "529.982.247-25".parse().unwrap();
        assert_eq!(cpf.as_str(), "52998224725");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cpf = Cpf::parse("52998224725").unwrap();
        let json = serde_json::to_string(&cpf).unwrap();
        assert_eq!(json, "\"52998224725\"");
        let back: Cpf = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cpf);
    }
}
