//! Identity projected from token claims
//!
//! The application only needs a username and a role. How to treat claims that
//! lack either field is decided by [`ClaimPolicy`].

use crate::claims::{Claims, ClaimsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role string the backend assigns to administrators
pub const ADMIN_ROLE: &str = "ADMIN";

/// Role string the backend assigns to regular customers
pub const CLIENT_ROLE: &str = "CLIENT";

/// Identity of the signed-in user, as shown to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Project claims into an identity under `policy`
    ///
    /// # Errors
    ///
    /// Under [`ClaimPolicy::Strict`], returns [`ClaimsError::MissingClaim`] when
    /// `sub` or `role` is absent or empty. The lenient policy never fails.
    pub fn from_claims(claims: &Claims, policy: ClaimPolicy) -> Result<Self, ClaimsError> {
        match policy {
            ClaimPolicy::Lenient => Ok(Self::new(
                claims.sub.clone().unwrap_or_default(),
                claims.role.clone().unwrap_or_default(),
            )),
            ClaimPolicy::Strict => {
                let username = required(claims.sub.as_deref(), "sub")?;
                let role = required(claims.role.as_deref(), "role")?;
                Ok(Self::new(username, role))
            }
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ClaimsError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ClaimsError::MissingClaim(name))
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

/// What to do with a token whose claims lack `sub` or `role`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimPolicy {
    /// Accept the token; missing fields become empty strings
    #[default]
    Lenient,
    /// Treat the token like an undecodable one
    Strict,
}

impl FromStr for ClaimPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown claim policy '{other}'")),
        }
    }
}
