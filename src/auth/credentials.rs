use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::api::ApiError;

/// Login credentials, read from a JSON document of the form
/// `{"email": "...", "password": "..."}`.
///
/// Credentials are ephemeral: the library only ever persists the session they
/// produce, never the credentials themselves.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
