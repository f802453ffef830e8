//! Word-list password derivation.
//!
//! One derived byte selects one word from a 256-entry list, so word
//! count maps directly to strength: 16 words carry 128 bits.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::derivation::{derive_key_material, parse_and_canonicalize};
use crate::error::CryptoError;
use crate::word_list::{DEFAULT_WORD_LIST, EN_256};

/// Default password strength in bits when the recipe specifies neither a
/// word count nor a bit length.
const DEFAULT_LENGTH_IN_BITS: u32 = 128;

/// Bits encoded per word by a 256-entry list.
const BITS_PER_WORD: u32 = 8;

/// A deterministically derived password.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Password {
    /// The password string: word count followed by capitalized words,
    /// dash-separated (e.g. `"3-Maple-Comet-Anchor"`).
    pub password: String,
    /// Canonical recipe JSON used for derivation.
    pub recipe: String,
}

/// JSON envelope for [`Password`].
#[derive(Serialize, Deserialize)]
struct PasswordJson {
    password: String,
    recipe: String,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

impl Password {
    /// Derive a password from a seed and recipe JSON.
    ///
    /// Word count comes from `lengthInWords`, else from `lengthInBits`
    /// rounded up to whole words, else defaults to 128 bits of strength.
    ///
    /// # Errors
    ///
    /// Recipe parse failures, unknown word lists, and derivation
    /// failures.
    pub fn derive_from_seed(seed: &str, recipe_json: &str) -> Result<Self, CryptoError> {
        let (recipe, canonical) = parse_and_canonicalize(recipe_json)?;

        if let Some(list) = &recipe.word_list
            && list != DEFAULT_WORD_LIST
        {
            return Err(CryptoError::UnknownWordList(list.clone()));
        }

        let words = match (recipe.length_in_words, recipe.length_in_bits) {
            (Some(words), _) => words,
            (None, Some(bits)) => bits.div_ceil(BITS_PER_WORD),
            (None, None) => DEFAULT_LENGTH_IN_BITS / BITS_PER_WORD,
        }
        .max(1) as usize;

        let material = derive_key_material(seed, &canonical, &recipe, words)?;

        let mut password = words.to_string();
        for byte in material.iter() {
            password.push('-');
            password.push_str(&capitalize(EN_256[*byte as usize]));
        }

        Ok(Self { password, recipe: canonical })
    }

    /// Serialize to the JSON envelope.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&PasswordJson {
            password: self.password.clone(),
            recipe: self.recipe.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: PasswordJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self { password: envelope.password, recipe: envelope.recipe })
    }
}
