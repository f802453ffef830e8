//! Fuzz target for recipe canonicalization
//!
//! Feeds arbitrary byte sequences through JSON parsing and
//! canonicalization to find:
//! - Panics on malformed or deeply nested JSON
//! - Canonical forms that fail to re-parse
//! - Inputs where canonicalization is not idempotent
//!
//! The fuzzer should NEVER panic. Invalid JSON should return an error.

#![no_main]

use dicevault_recipe::{canonicalize, canonicalize_recipe_json};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Canonicalizing arbitrary text must never panic.
    let Ok(canonical) = canonicalize_recipe_json(text) else {
        return;
    };

    // The canonical form must be valid JSON and a fixed point.
    let value: serde_json::Value =
        serde_json::from_str(&canonical).expect("canonical form must be valid JSON");
    assert_eq!(canonicalize(&value), canonical, "canonicalization must be idempotent");
});
