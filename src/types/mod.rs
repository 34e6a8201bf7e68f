//! Shared type definitions for the dashboard client

pub mod card;
pub mod request;
pub mod response;

pub use card::Card;
pub use request::{JSON_CONTENT_TYPE, Method, RequestSpec};
pub use response::{Company, Payload, Transaction, TransactionClient, decode_envelope};

/// Login identity for one dashboard account
#[derive(Clone)]
pub struct Credentials {
    /// Account email, also the key for the persisted cookie store
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create a new credentials value
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("merchant@example.gt", "secret");
        let rendered = format!("{:?}", credentials);

        assert!(rendered.contains("merchant@example.gt"));
        assert!(!rendered.contains("secret"));
    }
}
