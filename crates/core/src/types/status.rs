//! Role and status values shared between the server and the CLI.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Authorization role carried in issued tokens.
///
/// Derived from `customer.is_super_admin`; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Role for a customer with the given super-admin flag.
    #[must_use]
    pub const fn for_customer(is_super_admin: bool) -> Self {
        if is_super_admin { Self::Admin } else { Self::User }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status values written by the server itself.
///
/// `orders.payment_status` is free text supplied by clients; these are the
/// values the payment callback and checkout flow agree on.
pub struct PaymentStatus;

impl PaymentStatus {
    pub const PAID: &'static str = "Paid";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_for_customer() {
        assert_eq!(Role::for_customer(true), Role::Admin);
        assert_eq!(Role::for_customer(false), Role::User);
    }

    #[test]
    fn test_role_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"USER\"").unwrap(),
            Role::User
        );
        assert_eq!(Role::Admin.to_string(), "ADMIN");
    }
}
