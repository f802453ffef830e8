//! Recipe model, canonical JSON, and authorization evaluation.
//!
//! A recipe is a JSON document describing what to derive from a seed and
//! under which constraints. The canonical serialization of that document
//! is the exact byte string fed into the key-derivation hash, so two
//! semantically identical recipes must canonicalize to identical bytes -
//! any deviation silently derives a different key.
//!
//! This crate is pure data and pure functions: no I/O, no shared mutable
//! state. [`canonicalize`] and [`satisfies`] are safe to call concurrently
//! without synchronization.
//!
//! # Security
//!
//! - Canonicalization ordering is load-bearing: `"purpose"` sorts first
//!   and `"#"` (the sequence number) sorts last, everything else is
//!   lexicographic. Changing this ordering changes every derived key.
//! - Authorization decisions ([`satisfies`]) fail closed: an unmatched
//!   `allow` list rejects, and the handshake requirement is checked before
//!   any host/path matching.

pub mod authorization;
pub mod canonical;
pub mod error;
pub mod model;

pub use authorization::{SecurityContext, satisfies, satisfies_host, satisfies_path};
pub use canonical::{
    canonicalize, canonicalize_recipe_json, with_length_in_bytes, with_length_in_words,
    with_sequence_number,
};
pub use error::RecipeError;
pub use model::{
    AuthenticationRequirements, DerivableObjectType, HashFunction, Recipe, UnsealingInstructions,
    WebBasedApplicationIdentity,
};
