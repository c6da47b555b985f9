//! Status and role enums shared by the storefront and the back office.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Mutated only by back-office staff; any status may be set from any other
/// status (there is no transition guard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    InRoute,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in workflow order. Used to render the admin selector.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::InRoute,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Whether orders in this status count toward the per-CPF daily cap.
    ///
    /// Everything except a cancelled order holds its allowance.
    #[must_use]
    pub const fn counts_toward_cap(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether orders in this status count as realized revenue for the
    /// finance and best-seller views.
    #[must_use]
    pub const fn counts_as_revenue(self) -> bool {
        matches!(self, Self::Approved | Self::InRoute | Self::Delivered)
    }

    /// Customer-facing label (pt-BR).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Approved => "Aprovado",
            Self::InRoute => "Em Rota",
            Self::Delivered => "Entregue",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Wire value, matching the database enum.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::InRoute => "in_route",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "in_route" => Ok(Self::InRoute),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the customer pays the courier on delivery.
///
/// All methods are settled at the door; there is no online capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Pix,
    Card,
}

impl PaymentMethod {
    /// All methods, in the order the checkout form offers them.
    pub const ALL: [Self; 3] = [Self::Cash, Self::Pix, Self::Card];

    /// Customer-facing label (pt-BR).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Dinheiro",
            Self::Pix => "PIX",
            Self::Card => "Cartão",
        }
    }

    /// Wire value, matching the database enum.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Pix => "pix",
            Self::Card => "card",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "pix" => Ok(Self::Pix),
            "card" => Ok(Self::Card),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Application role attached to a user.
///
/// Back-office access requires an `admin` role row; every account is a
/// customer by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().expect("roundtrip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_cancelled_releases_cap_allowance() {
        assert!(OrderStatus::Pending.counts_toward_cap());
        assert!(OrderStatus::Approved.counts_toward_cap());
        assert!(OrderStatus::InRoute.counts_toward_cap());
        assert!(OrderStatus::Delivered.counts_toward_cap());
        assert!(!OrderStatus::Cancelled.counts_toward_cap());
    }

    #[test]
    fn test_revenue_statuses() {
        assert!(!OrderStatus::Pending.counts_as_revenue());
        assert!(OrderStatus::Approved.counts_as_revenue());
        assert!(OrderStatus::InRoute.counts_as_revenue());
        assert!(OrderStatus::Delivered.counts_as_revenue());
        assert!(!OrderStatus::Cancelled.counts_as_revenue());
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Cash.label(), "Dinheiro");
        assert_eq!(PaymentMethod::Pix.label(), "PIX");
        assert_eq!(PaymentMethod::Card.label(), "Cartão");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::InRoute).expect("serialize");
        assert_eq!(json, "\"in_route\"");
        let method: PaymentMethod = serde_json::from_str("\"pix\"").expect("deserialize");
        assert_eq!(method, PaymentMethod::Pix);
    }
}
