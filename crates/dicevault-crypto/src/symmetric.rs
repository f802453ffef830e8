//! Symmetric sealing with XChaCha20-Poly1305.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::derivation::{derive_key_material, parse_and_canonicalize};
use crate::encoding::{from_base64url, to_base64url};
use crate::error::CryptoError;
use crate::packaged::PackagedSealedMessage;

/// Key length for XChaCha20-Poly1305.
const KEY_LENGTH: usize = 32;

/// Nonce length for the extended-nonce construction.
const NONCE_LENGTH: usize = 24;

/// A deterministically derived symmetric key.
///
/// Sealing is randomized (fresh nonce per message); only the key itself
/// is deterministic in `(seed, recipe)`.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    /// The raw key bytes.
    pub key_bytes: Vec<u8>,
    /// Canonical recipe JSON used for derivation.
    pub recipe: String,
}

/// JSON envelope for [`SymmetricKey`].
#[derive(Serialize, Deserialize)]
struct SymmetricKeyJson {
    #[serde(rename = "keyBytes")]
    key_bytes: String,
    recipe: String,
}

impl SymmetricKey {
    /// Derive a symmetric key from a seed and recipe JSON.
    pub fn derive_from_seed(seed: &str, recipe_json: &str) -> Result<Self, CryptoError> {
        let (recipe, canonical) = parse_and_canonicalize(recipe_json)?;
        let material = derive_key_material(seed, &canonical, &recipe, KEY_LENGTH)?;
        Ok(Self { key_bytes: material.to_vec(), recipe: canonical })
    }

    fn cipher(&self) -> Result<XChaCha20Poly1305, CryptoError> {
        XChaCha20Poly1305::new_from_slice(&self.key_bytes).map_err(|_| {
            CryptoError::InvalidKeyLength { expected: KEY_LENGTH, actual: self.key_bytes.len() }
        })
    }

    /// Seal a plaintext, binding the optional unsealing instructions as
    /// associated data. Ciphertext layout: `nonce || aead_ciphertext`.
    pub fn seal(
        &self,
        plaintext: &[u8],
        unsealing_instructions: Option<&str>,
    ) -> Result<PackagedSealedMessage, CryptoError> {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);

        let aad = unsealing_instructions.map_or(&[] as &[u8], str::as_bytes);
        let sealed = self
            .cipher()?
            .encrypt(XNonce::from_slice(&nonce), Payload { msg: plaintext, aad })
            .map_err(|_| CryptoError::SealFailure)?;

        let mut ciphertext = Vec::with_capacity(NONCE_LENGTH + sealed.len());
        ciphertext.extend_from_slice(&nonce);
        ciphertext.extend_from_slice(&sealed);

        Ok(PackagedSealedMessage {
            ciphertext,
            recipe_json: self.recipe.clone(),
            unsealing_instructions: unsealing_instructions.map(str::to_string),
        })
    }

    /// Unseal a packaged message sealed with this key.
    ///
    /// # Errors
    ///
    /// `CryptoError::UnsealFailure` on a wrong key, corrupted
    /// ciphertext, or instructions that differ from those sealed in.
    pub fn unseal(&self, message: &PackagedSealedMessage) -> Result<Vec<u8>, CryptoError> {
        if message.ciphertext.len() < NONCE_LENGTH {
            return Err(CryptoError::CiphertextTooShort(message.ciphertext.len()));
        }
        let (nonce, sealed) = message.ciphertext.split_at(NONCE_LENGTH);

        self.cipher()?
            .decrypt(XNonce::from_slice(nonce), Payload { msg: sealed, aad: message.associated_data() })
            .map_err(|_| CryptoError::UnsealFailure)
    }

    /// Serialize to the JSON envelope (`keyBytes` base64url).
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&SymmetricKeyJson {
            key_bytes: to_base64url(&self.key_bytes),
            recipe: self.recipe.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: SymmetricKeyJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self { key_bytes: from_base64url(&envelope.key_bytes)?, recipe: envelope.recipe })
    }
}
