//! Claim extraction from signed bearer tokens
//!
//! Tokens are three dot-separated segments (header, payload, signature). Only
//! the payload is read; the signature is never checked, so the resulting
//! [`Claims`] are advisory UI hints and must not back any security decision.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const LENIENT_PADDING: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

// Tokens are issued base64url encoded; browsers' atob() also accepts the
// standard alphabet, so both are tried.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT_PADDING);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT_PADDING);

/// Why a token could not be turned into claims
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token must have three dot-separated segments, found {0}")]
    Malformed(usize),

    #[error("payload segment is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("required claim '{0}' is missing")]
    MissingClaim(&'static str),
}

/// Claims carried in a token payload
///
/// `sub` and `role` are what the storefront backend issues; any other members
/// are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Decode the payload segment of `token`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token does not have exactly three segments
    /// - The payload is not base64 (URL-safe or standard, padding optional)
    /// - The decoded bytes are not UTF-8 encoded JSON
    /// - The JSON value is not an object
    pub fn from_token(token: &str) -> Result<Self, ClaimsError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(ClaimsError::Malformed(segments.len()));
        }

        let payload_b64 = segments[1];
        let payload_bytes = URL_SAFE_LENIENT
            .decode(payload_b64)
            .or_else(|_| STANDARD_LENIENT.decode(payload_b64))?;
        let payload_str = String::from_utf8(payload_bytes)?;

        let value: Value = serde_json::from_str(&payload_str)?;
        if !value.is_object() {
            return Err(ClaimsError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Advisory expiry time from the `exp` claim
    ///
    /// The session core never enforces this; the remote API rejects expired
    /// tokens on its own.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Advisory issue time from the `iat` claim
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }
}

/// Read a NumericDate (seconds since epoch) without failing the whole payload
///
/// Fractional seconds are truncated; values of any other JSON type become
/// `None`. The core never relies on these claims.
#[allow(clippy::cast_possible_truncation)]
fn lenient_numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|secs| secs.is_finite())
                .map(|secs| secs.trunc() as i64)
        }),
        _ => None,
    })
}

/// Decode claims from an optional token, degrading every failure to `None`
#[must_use]
pub fn decode(token: Option<&str>) -> Option<Claims> {
    let token = token?;
    match Claims::from_token(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Discarding undecodable token ({} bytes): {e}", token.len());
            None
        }
    }
}
