//! Username/password pair used for HTTP Basic authentication.

use serde::{Deserialize, Serialize};

use crate::base64::basic_auth_value;

/// Login credentials.
///
/// The controller treats them as opaque: they are only ever encoded into an
/// authorization value, never validated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Authorization` header value for these credentials.
    pub fn authorization(&self) -> String {
        basic_auth_value(&self.username, &self.password)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
