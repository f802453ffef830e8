//! Authentication handshake tokens.
//!
//! A client proves it can receive responses at its stated URL by first
//! requesting a token (which is only ever delivered to that URL) and
//! echoing it back on the real request. A token validates only against
//! the exact response URL it was issued for.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Token entropy in bytes.
const TOKEN_LENGTH: usize = 32;

/// Issued handshake tokens, keyed by token value.
#[derive(Debug, Default)]
pub struct AuthTokenStore {
    issued: HashMap<String, String>,
}

impl AuthTokenStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token bound to a response URL.
    ///
    /// The caller is responsible for delivering the token only to
    /// `respond_to`; the store just records the binding.
    pub fn issue(&mut self, respond_to: &str) -> String {
        let mut bytes = [0u8; TOKEN_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        self.issued.insert(token.clone(), respond_to.to_string());
        token
    }

    /// Whether `token` was issued for exactly this response URL.
    #[must_use]
    pub fn validates(&self, token: &str, respond_to: &str) -> bool {
        self.issued.get(token).is_some_and(|issued_for| issued_for == respond_to)
    }
}
