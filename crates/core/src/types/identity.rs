//! Identity namespaces used to scope per-user data.

use core::fmt;

use crate::types::email::Email;

/// Prefix of every cart key in the persistent store.
pub const CART_KEY_PREFIX: &str = "cart";

/// Namespace used when nobody is signed in.
pub const GUEST_NAMESPACE: &str = "guest";

/// Whose data is being read or written.
///
/// Signed-in users are namespaced by their email; everyone else shares the
/// guest namespace. Data is never merged across namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityNamespace {
    User(Email),
    Guest,
}

impl IdentityNamespace {
    /// Namespace for an optional signed-in email.
    #[must_use]
    pub fn from_email(email: Option<Email>) -> Self {
        email.map_or(Self::Guest, Self::User)
    }

    /// The namespace string, i.e. the email or `guest`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(email) => email.as_str(),
            Self::Guest => GUEST_NAMESPACE,
        }
    }

    /// Whether this is the anonymous namespace.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Store key holding this namespace's cart (`cart:<namespace>`).
    #[must_use]
    pub fn cart_key(&self) -> String {
        format!("{CART_KEY_PREFIX}:{}", self.as_str())
    }
}

impl fmt::Display for IdentityNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_keys() {
        let user = IdentityNamespace::User(Email::parse("ann@library.test").unwrap());
        assert_eq!(user.cart_key(), "cart:ann@library.test");
        assert_eq!(IdentityNamespace::Guest.cart_key(), "cart:guest");
    }

    #[test]
    fn test_from_email() {
        assert!(IdentityNamespace::from_email(None).is_guest());
        let ns = IdentityNamespace::from_email(Email::parse("b@c.d").ok());
        assert_eq!(ns.as_str(), "b@c.d");
        assert!(!ns.is_guest());
    }
}
