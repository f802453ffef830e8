//! Error types for seeded cryptography.

use thiserror::Error;

/// Errors from derivation, sealing, unsealing, or signing.
///
/// Passed through the API layer opaquely: derivation is deterministic,
/// so a failed operation cannot succeed on retry with the same inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key derivation failed (invalid parameters or unsupported length).
    #[error("key derivation failed: {0}")]
    DerivationFailure(String),

    /// Derived or supplied key material has the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        actual: usize,
    },

    /// AEAD sealing failed.
    #[error("seal operation failed")]
    SealFailure,

    /// AEAD unsealing failed (wrong key, corrupted ciphertext, or
    /// tampered instructions).
    #[error("unseal operation failed")]
    UnsealFailure,

    /// Ciphertext is too short to carry its framing.
    #[error("ciphertext too short: {0} bytes")]
    CiphertextTooShort(usize),

    /// Base64url decoding failed.
    #[error("invalid base64url: {0}")]
    Decode(String),

    /// A derived-object JSON envelope could not be parsed.
    #[error("invalid object JSON: {0}")]
    InvalidJson(String),

    /// Recipe JSON supplied to a derivation could not be parsed.
    #[error("invalid recipe JSON: {0}")]
    InvalidRecipe(String),

    /// The recipe names a word list this build does not carry.
    #[error("unknown word list: {0}")]
    UnknownWordList(String),
}
