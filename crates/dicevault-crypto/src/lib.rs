//! DiceVault Seeded Cryptography
//!
//! Deterministic derivation of secrets, passwords, and keys from a
//! `(seed, canonical recipe)` pair, plus the sealing, unsealing, and
//! signing operations built on the derived keys.
//!
//! # Key Lifecycle
//!
//! ```text
//! Seed string (canonical DiceKey reading)
//!        │
//!        ▼
//! HKDF / Argon2id keyed by the canonical recipe JSON
//!        │
//!        ├── Secret (raw bytes)
//!        ├── Password (word-list encoding)
//!        ├── SymmetricKey ──► seal / unseal (XChaCha20-Poly1305)
//!        ├── SigningKey ──► sign (Ed25519) ──► SignatureVerificationKey
//!        └── UnsealingKey ──► unseal ◄── SealingKey (X25519 sealed box)
//! ```
//!
//! Derivation is pure: the same seed and the same canonical recipe bytes
//! always produce the same object. The canonical recipe string is bound
//! into the derivation info, so any change to the recipe - even
//! whitespace that survived canonicalization - produces an unrelated key.
//!
//! # Security
//!
//! - Sealed messages bind their unsealing instructions as AEAD associated
//!   data: tampering with the instructions fails the unseal.
//! - Raw key material is zeroized on drop wherever a type owns it.
//! - Sealing uses fresh randomness (nonces, ephemeral keys); only
//!   derivation is deterministic.

pub mod derivation;
pub mod encoding;
pub mod error;
pub mod packaged;
pub mod password;
pub mod sealing;
pub mod secret;
pub mod signing;
pub mod symmetric;
mod word_list;

pub use derivation::{derive_key_material, parse_and_canonicalize};
pub use encoding::{from_base64url, to_base64url};
pub use error::CryptoError;
pub use packaged::PackagedSealedMessage;
pub use password::Password;
pub use sealing::{SealingKey, UnsealingKey};
pub use secret::Secret;
pub use signing::{SignatureVerificationKey, SigningKey};
pub use symmetric::SymmetricKey;
