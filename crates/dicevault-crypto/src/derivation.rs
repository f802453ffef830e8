//! Key-material derivation from (seed, canonical recipe).
//!
//! The canonical recipe JSON is bound into the derivation as the HKDF
//! info (or the Argon2 salt), so every distinct canonical string yields
//! unrelated key material. This is why canonicalization upstream is
//! load-bearing: a recipe that serializes differently derives a
//! different key.

use argon2::{Algorithm, Argon2, Params, Version};
use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use dicevault_recipe::{HashFunction, Recipe};

use crate::error::CryptoError;

/// Label bound into HKDF derivations.
const DERIVATION_LABEL: &[u8] = b"dicevaultDeriveV1";

/// Default memory limit for Argon2id, in bytes (64 MiB).
const DEFAULT_MEMORY_LIMIT_BYTES: u64 = 67_108_864;

/// Default number of Argon2id memory passes.
const DEFAULT_MEMORY_PASSES: u32 = 2;

/// Parse recipe JSON and compute its canonical string.
///
/// An empty (or whitespace-only) recipe is valid where the caller has
/// separately proven it safe; its canonical form is the empty string, so
/// hand-written and programmatic empty recipes hash identically.
///
/// # Errors
///
/// `CryptoError::InvalidRecipe` if the JSON is malformed.
pub fn parse_and_canonicalize(recipe_json: &str) -> Result<(Recipe, String), CryptoError> {
    if recipe_json.trim().is_empty() {
        return Ok((Recipe::default(), String::new()));
    }
    let recipe = Recipe::parse(Some(recipe_json))
        .map_err(|e| CryptoError::InvalidRecipe(e.to_string()))?;
    let canonical = dicevault_recipe::canonicalize_recipe_json(recipe_json)
        .map_err(|e| CryptoError::InvalidRecipe(e.to_string()))?;
    Ok((recipe, canonical))
}

/// Derive `length` bytes of key material from a seed and the canonical
/// recipe string.
///
/// The default hash function is a fast HKDF-SHA256 expansion; a recipe
/// requesting `Argon2id` gets a memory-hard derivation honoring the
/// recipe's memory limit and pass count.
///
/// # Errors
///
/// `CryptoError::DerivationFailure` if `length` exceeds what the hash
/// function can produce or the Argon2 parameters are out of range.
pub fn derive_key_material(
    seed: &str,
    canonical_recipe_json: &str,
    recipe: &Recipe,
    length: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    match recipe.hash_function.unwrap_or(HashFunction::BLAKE2b) {
        HashFunction::BLAKE2b => derive_hkdf(seed, canonical_recipe_json, length),
        HashFunction::Argon2id => derive_argon2id(seed, canonical_recipe_json, recipe, length),
    }
}

fn derive_hkdf(
    seed: &str,
    canonical_recipe_json: &str,
    length: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let hkdf = Hkdf::<Sha256>::new(None, seed.as_bytes());

    let mut info = Vec::with_capacity(DERIVATION_LABEL.len() + canonical_recipe_json.len());
    info.extend_from_slice(DERIVATION_LABEL);
    info.extend_from_slice(canonical_recipe_json.as_bytes());

    let mut out = Zeroizing::new(vec![0u8; length]);
    hkdf.expand(&info, &mut out)
        .map_err(|_| CryptoError::DerivationFailure(format!("invalid output length {length}")))?;
    Ok(out)
}

fn derive_argon2id(
    seed: &str,
    canonical_recipe_json: &str,
    recipe: &Recipe,
    length: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let memory_bytes =
        recipe.hash_function_memory_limit_in_bytes.unwrap_or(DEFAULT_MEMORY_LIMIT_BYTES);
    let memory_kib = u32::try_from(memory_bytes / 1024)
        .map_err(|_| CryptoError::DerivationFailure("memory limit out of range".to_string()))?;
    let passes = recipe.hash_function_memory_passes.unwrap_or(DEFAULT_MEMORY_PASSES);

    let params = Params::new(memory_kib, passes, 1, Some(length))
        .map_err(|e| CryptoError::DerivationFailure(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    // The canonical recipe string keys the derivation, hashed down to a
    // fixed-size salt.
    let salt = Sha256::digest(canonical_recipe_json.as_bytes());

    let mut out = Zeroizing::new(vec![0u8; length]);
    argon2
        .hash_password_into(seed.as_bytes(), &salt, &mut out)
        .map_err(|e| CryptoError::DerivationFailure(e.to_string()))?;
    Ok(out)
}
