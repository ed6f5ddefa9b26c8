//! Result of a successful remote authentication
//!
//! The remote API answers login and registration with a JSON body carrying at
//! least a `token`. Identity fields may ride along; when they don't, the
//! identity is derived from the token itself.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthResponse {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: None,
            role: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_identity(mut self, identity: &Identity) -> Self {
        self.username = Some(identity.username.clone());
        self.role = Some(identity.role.clone());
        self
    }

    /// Parse a response body
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON or has no string `token`.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Identity carried in the response, when both fields are present
    #[must_use]
    pub fn supplied_identity(&self) -> Option<Identity> {
        match (&self.username, &self.role) {
            (Some(username), Some(role)) => Some(Identity::new(username.clone(), role.clone())),
            _ => None,
        }
    }
}

// Keep the bearer token out of logs
impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &format_args!("<{} bytes>", self.token.len()))
            .field("username", &self.username)
            .field("role", &self.role)
            .field("extra", &self.extra)
            .finish()
    }
}
