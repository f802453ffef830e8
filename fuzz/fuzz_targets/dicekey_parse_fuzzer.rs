//! Fuzz target for DiceKey human-readable parsing
//!
//! Tests parsing of arbitrary strings as 75- or 50-character DiceKey
//! readings to find:
//! - Panics on invalid letters, digits, or orientation characters
//! - Length-handling bugs around the two accepted formats
//! - Canonicalization disagreement across the four rotations
//!
//! The fuzzer should NEVER panic. Invalid readings should return an error.

#![no_main]

use dicevault_dice::DiceKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(key) = DiceKey::from_human_readable(text) else {
        return;
    };

    // Any successfully parsed key must canonicalize consistently: all
    // four rotations agree on the seed.
    let seed = key.rotated_to_canonical_form(true).to_seed(true);
    for rotation in key.all_rotations() {
        assert_eq!(rotation.rotated_to_canonical_form(true).to_seed(true), seed);
    }
});
