//! Derived raw secrets.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::derivation::{derive_key_material, parse_and_canonicalize};
use crate::encoding::{from_base64url, to_base64url};
use crate::error::CryptoError;

/// Default secret length in bytes.
const DEFAULT_LENGTH_IN_BYTES: u32 = 32;

/// A deterministically derived secret: raw bytes plus the canonical
/// recipe that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    /// The derived bytes.
    pub secret_bytes: Vec<u8>,
    /// Canonical recipe JSON used for derivation.
    pub recipe: String,
}

/// JSON envelope for [`Secret`].
#[derive(Serialize, Deserialize)]
struct SecretJson {
    #[serde(rename = "secretBytes")]
    secret_bytes: String,
    recipe: String,
}

impl Secret {
    /// Derive a secret from a seed and recipe JSON.
    ///
    /// Honors the recipe's `lengthInBytes` (default 32).
    ///
    /// # Errors
    ///
    /// Recipe parse failures and derivation failures.
    pub fn derive_from_seed(seed: &str, recipe_json: &str) -> Result<Self, CryptoError> {
        let (recipe, canonical) = parse_and_canonicalize(recipe_json)?;
        let length = recipe.length_in_bytes.unwrap_or(DEFAULT_LENGTH_IN_BYTES) as usize;
        let material = derive_key_material(seed, &canonical, &recipe, length)?;
        Ok(Self { secret_bytes: material.to_vec(), recipe: canonical })
    }

    /// Serialize to the JSON envelope (`secretBytes` base64url).
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&SecretJson {
            secret_bytes: to_base64url(&self.secret_bytes),
            recipe: self.recipe.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: SecretJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self { secret_bytes: from_base64url(&envelope.secret_bytes)?, recipe: envelope.recipe })
    }
}
