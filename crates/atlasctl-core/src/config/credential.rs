//! Resolved credentials
//!
//! These are the values the rest of the crate consumes once configuration has
//! been merged. `Debug` output never includes secrets.

use std::fmt;

/// Public/private key pair used for digest authentication against the API
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub public_key: String,
    pub private_key: String,
}

impl ApiCredentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Administrative database user created on every provisioned cluster
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

impl DatabaseCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_private_key() {
        let creds = ApiCredentials::new("public", "very-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("public"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_debug_redacts_database_password() {
        let creds = DatabaseCredentials::new("admin", "Password1");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("Password1"));
    }
}
