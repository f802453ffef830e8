//! Deterministic JSON canonicalization.
//!
//! The canonical string of a recipe is the exact byte sequence fed into
//! the key-derivation hash. Ordering and formatting rules here are
//! load-bearing: `"purpose"` always sorts first, `"#"` (the sequence
//! number) always sorts last, all other keys sort lexicographically, and
//! no whitespace is ever inserted.
//!
//! # Invariants
//!
//! - Idempotence: canonicalizing canonical output is a no-op.
//! - Key-order invariance: reordering keys in the input never changes the
//!   output.
//!
//! Both are verified by property tests in `tests/canonical_properties.rs`.

use std::cmp::Ordering;
use std::fmt::Write;

use serde_json::Value;

use crate::error::RecipeError;

/// Key that always sorts first within an object.
const FIRST_KEY: &str = "purpose";

/// Key that always sorts last within an object (the sequence number).
const LAST_KEY: &str = "#";

/// Compare two object keys in canonical order.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a == FIRST_KEY, b == FIRST_KEY) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {},
    }
    match (a == LAST_KEY, b == LAST_KEY) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

/// Canonicalize a parsed JSON value.
///
/// Total and deterministic over all JSON values. Objects are emitted with
/// keys in canonical order and no whitespace; arrays preserve element
/// order (array order is semantically meaningful); strings are emitted as
/// JSON strings; numbers, booleans, and `null` use their standard JSON
/// rendering.
#[must_use]
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        },
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        },
        Value::String(s) => {
            // serde_json's string serialization cannot fail.
            if let Ok(quoted) = serde_json::to_string(s) {
                out.push_str(&quoted);
            }
        },
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        },
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_by(|a, b| compare_keys(a, b));

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if let Ok(quoted) = serde_json::to_string(key) {
                    out.push_str(&quoted);
                }
                out.push(':');
                if let Some(item) = map.get(key.as_str()) {
                    write_canonical(item, out);
                }
            }
            out.push('}');
        },
    }
}

/// Parse recipe JSON and return its canonical string.
///
/// Field-level edits go through [`with_sequence_number`] and the length
/// helpers below, which re-canonicalize on every edit so the stored
/// string stays byte-equal to an equivalent hand-written recipe.
///
/// # Errors
///
/// `RecipeError::InvalidRecipeJson` if the input is not valid JSON.
pub fn canonicalize_recipe_json(json: &str) -> Result<String, RecipeError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| RecipeError::InvalidRecipeJson(e.to_string()))?;
    Ok(canonicalize(&value))
}

/// Return `recipe_json` with the sequence number (`"#"`) set or removed.
///
/// The output is the canonical string, so a programmatic edit hashes
/// identically to a hand-written recipe carrying the same fields. `None`
/// or empty input starts from the empty recipe.
///
/// # Errors
///
/// `RecipeError::InvalidRecipeJson` if the input is not a JSON object.
pub fn with_sequence_number(
    recipe_json: Option<&str>,
    sequence: Option<u64>,
) -> Result<String, RecipeError> {
    with_numeric_field(recipe_json, LAST_KEY, sequence)
}

/// Return `recipe_json` with `lengthInBytes` set or removed, canonical.
///
/// # Errors
///
/// `RecipeError::InvalidRecipeJson` if the input is not a JSON object.
pub fn with_length_in_bytes(
    recipe_json: Option<&str>,
    length: Option<u64>,
) -> Result<String, RecipeError> {
    with_numeric_field(recipe_json, "lengthInBytes", length)
}

/// Return `recipe_json` with `lengthInWords` set or removed, canonical.
///
/// # Errors
///
/// `RecipeError::InvalidRecipeJson` if the input is not a JSON object.
pub fn with_length_in_words(
    recipe_json: Option<&str>,
    length: Option<u64>,
) -> Result<String, RecipeError> {
    with_numeric_field(recipe_json, "lengthInWords", length)
}

fn with_numeric_field(
    recipe_json: Option<&str>,
    key: &str,
    new_value: Option<u64>,
) -> Result<String, RecipeError> {
    let mut object = match recipe_json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => {
            let parsed: Value = serde_json::from_str(json)
                .map_err(|e| RecipeError::InvalidRecipeJson(e.to_string()))?;
            match parsed {
                Value::Object(map) => map,
                _ => {
                    return Err(RecipeError::InvalidRecipeJson(
                        "recipe must be a JSON object".to_string(),
                    ));
                },
            }
        },
        None => serde_json::Map::new(),
    };

    match new_value {
        Some(n) => {
            object.insert(key.to_string(), Value::from(n));
        },
        None => {
            object.remove(key);
        },
    }
    Ok(canonicalize(&Value::Object(object)))
}
