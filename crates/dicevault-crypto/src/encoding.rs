//! Base64url encoding used across persisted and wire artifacts.
//!
//! Standard base64 with `+` → `-` and `/` → `_`; padding is stripped on
//! output and tolerated on input.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::CryptoError;

/// Encode bytes as unpadded base64url.
#[must_use]
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url, accepting both padded and unpadded input.
///
/// # Errors
///
/// `CryptoError::Decode` if the input is not valid base64url.
pub fn from_base64url(input: &str) -> Result<Vec<u8>, CryptoError> {
    let trimmed = input.trim_end_matches('=');
    URL_SAFE_NO_PAD.decode(trimmed).map_err(|e| CryptoError::Decode(e.to_string()))
}
