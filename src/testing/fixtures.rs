//! Test fixtures providing pre-built tokens and stores

use super::constants::{
    TEST_ISSUED_AT, TEST_SIGNING_KEY, TEST_TOKEN_LIFETIME_SECS, TEST_USERNAME,
};
use crate::identity::CLIENT_ROLE;
use crate::store::{MemoryStore, TOKEN_KEY};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

pub struct TestFixtures;

impl TestFixtures {
    /// Sign `payload` as an HS256 token, the way the storefront backend does
    ///
    /// # Panics
    ///
    /// Panics if the payload cannot be serialized.
    #[must_use]
    pub fn signed_token(payload: &Value) -> String {
        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_b64 = URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(payload).expect("payload should serialize"));

        let message = format!("{header_b64}.{payload_b64}");
        let mut mac =
            HmacSha256::new_from_slice(TEST_SIGNING_KEY).expect("HMAC accepts any key length");
        mac.update(message.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{message}.{signature_b64}")
    }

    /// Token carrying `sub`, `role`, `iat` and `exp` claims
    #[must_use]
    pub fn token_for(username: &str, role: &str) -> String {
        Self::signed_token(&json!({
            "sub": username,
            "role": role,
            "iat": TEST_ISSUED_AT,
            "exp": TEST_ISSUED_AT + TEST_TOKEN_LIFETIME_SECS,
        }))
    }

    /// Token for the default fixture user with the `CLIENT` role
    #[must_use]
    pub fn client_token() -> String {
        Self::token_for(TEST_USERNAME, CLIENT_ROLE)
    }

    /// Token whose payload segment is not base64
    #[must_use]
    pub fn malformed_token() -> String {
        "eyJhbGciOiJIUzI1NiJ9.***.signature".to_string()
    }

    /// Memory store already holding `token` under the credential key
    #[must_use]
    pub fn store_with_token(token: &str) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_entry(TOKEN_KEY, token))
    }
}
