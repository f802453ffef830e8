//! The packaged sealed message: ciphertext plus everything needed to
//! later unseal it.

use serde::{Deserialize, Serialize};

use crate::encoding::{from_base64url, to_base64url};
use crate::error::CryptoError;

/// Ciphertext bundled with the recipe that derived its key and the
/// optional unsealing instructions constraining who may decrypt it.
///
/// The ciphertext is opaque to everything above the crypto layer; only
/// the recipe and instructions are ever interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedSealedMessage {
    /// Opaque ciphertext (including any nonce/ephemeral-key framing).
    pub ciphertext: Vec<u8>,
    /// Canonical recipe JSON used to derive the sealing key.
    pub recipe_json: String,
    /// Constraints on who may unseal, as a JSON string. `None` means no
    /// instructions were attached (distinct from empty instructions).
    pub unsealing_instructions: Option<String>,
}

/// JSON envelope: ciphertext as base64url.
#[derive(Serialize, Deserialize)]
struct PackagedSealedMessageJson {
    ciphertext: String,
    #[serde(rename = "recipeJson")]
    recipe_json: String,
    #[serde(rename = "unsealingInstructions", skip_serializing_if = "Option::is_none")]
    unsealing_instructions: Option<String>,
}

impl PackagedSealedMessage {
    /// The instructions bytes bound into the seal as associated data.
    ///
    /// Absent instructions bind as empty, so adding instructions after
    /// the fact breaks the authentication tag.
    #[must_use]
    pub fn associated_data(&self) -> &[u8] {
        self.unsealing_instructions.as_deref().map_or(&[], str::as_bytes)
    }

    /// Serialize to the JSON envelope.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&PackagedSealedMessageJson {
            ciphertext: to_base64url(&self.ciphertext),
            recipe_json: self.recipe_json.clone(),
            unsealing_instructions: self.unsealing_instructions.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: PackagedSealedMessageJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self {
            ciphertext: from_base64url(&envelope.ciphertext)?,
            recipe_json: envelope.recipe_json,
            unsealing_instructions: envelope.unsealing_instructions,
        })
    }
}
