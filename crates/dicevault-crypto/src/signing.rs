//! Ed25519 signing and verification keys.

use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::derivation::{derive_key_material, parse_and_canonicalize};
use crate::encoding::{from_base64url, to_base64url};
use crate::error::CryptoError;

/// Ed25519 secret seed length.
const SEED_LENGTH: usize = 32;

/// A deterministically derived Ed25519 signing key.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    /// The 32-byte Ed25519 secret seed.
    pub signing_key_bytes: Vec<u8>,
    /// Canonical recipe JSON used for derivation.
    pub recipe: String,
}

/// The public half of a derived signing key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureVerificationKey {
    /// The 32-byte Ed25519 public key.
    pub verification_key_bytes: Vec<u8>,
    /// Canonical recipe JSON used for derivation.
    pub recipe: String,
}

/// JSON envelope for [`SigningKey`].
#[derive(Serialize, Deserialize)]
struct SigningKeyJson {
    #[serde(rename = "signingKeyBytes")]
    signing_key_bytes: String,
    recipe: String,
}

/// JSON envelope for [`SignatureVerificationKey`].
#[derive(Serialize, Deserialize)]
struct VerificationKeyJson {
    #[serde(rename = "signatureVerificationKeyBytes")]
    verification_key_bytes: String,
    recipe: String,
}

impl SigningKey {
    /// Derive a signing key from a seed and recipe JSON.
    pub fn derive_from_seed(seed: &str, recipe_json: &str) -> Result<Self, CryptoError> {
        let (recipe, canonical) = parse_and_canonicalize(recipe_json)?;
        let material = derive_key_material(seed, &canonical, &recipe, SEED_LENGTH)?;
        Ok(Self { signing_key_bytes: material.to_vec(), recipe: canonical })
    }

    fn dalek_key(&self) -> Result<ed25519_dalek::SigningKey, CryptoError> {
        let bytes: [u8; SEED_LENGTH] =
            self.signing_key_bytes.as_slice().try_into().map_err(|_| {
                CryptoError::InvalidKeyLength {
                    expected: SEED_LENGTH,
                    actual: self.signing_key_bytes.len(),
                }
            })?;
        Ok(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// Sign a message, returning the 64-byte signature.
    pub fn generate_signature(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.dalek_key()?.sign(message).to_bytes().to_vec())
    }

    /// The public verification key for this signing key.
    pub fn verification_key(&self) -> Result<SignatureVerificationKey, CryptoError> {
        Ok(SignatureVerificationKey {
            verification_key_bytes: self.dalek_key()?.verifying_key().to_bytes().to_vec(),
            recipe: self.recipe.clone(),
        })
    }

    /// Serialize to the JSON envelope.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&SigningKeyJson {
            signing_key_bytes: to_base64url(&self.signing_key_bytes),
            recipe: self.recipe.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: SigningKeyJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self {
            signing_key_bytes: from_base64url(&envelope.signing_key_bytes)?,
            recipe: envelope.recipe,
        })
    }
}

impl SignatureVerificationKey {
    /// Verify a signature over a message.
    ///
    /// Returns `Ok(true)` for a valid signature, `Ok(false)` for an
    /// invalid one; errors only for malformed key or signature bytes.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        let key_bytes: [u8; 32] =
            self.verification_key_bytes.as_slice().try_into().map_err(|_| {
                CryptoError::InvalidKeyLength {
                    expected: 32,
                    actual: self.verification_key_bytes.len(),
                }
            })?;
        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| CryptoError::Decode(e.to_string()))?;

        let signature_bytes: [u8; 64] = signature.try_into().map_err(|_| {
            CryptoError::InvalidKeyLength { expected: 64, actual: signature.len() }
        })?;
        let signature = Signature::from_bytes(&signature_bytes);

        Ok(key.verify(message, &signature).is_ok())
    }

    /// Serialize to the JSON envelope.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&VerificationKeyJson {
            verification_key_bytes: to_base64url(&self.verification_key_bytes),
            recipe: self.recipe.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: VerificationKeyJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self {
            verification_key_bytes: from_base64url(&envelope.verification_key_bytes)?,
            recipe: envelope.recipe,
        })
    }
}
