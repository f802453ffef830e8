//! Value types for recipes and unsealing instructions.
//!
//! `Recipe` and `UnsealingInstructions` are two otherwise-unrelated JSON
//! documents that share the same authentication constraints (`allow`,
//! `requireAuthenticationHandshake`, `allowAndroidPrefixes`). The shared
//! surface is expressed as the [`AuthenticationRequirements`] trait so the
//! matching logic in [`crate::authorization`] exists exactly once.
//!
//! Field names follow the wire format (camelCase, `"#"` for the sequence
//! number); unset fields are omitted from serialization so a round-tripped
//! recipe never gains spurious keys.

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

/// A web application identity an `allow` list entry grants access to.
///
/// `host` may carry a leading `"*."` wildcard meaning "this domain or any
/// subdomain". `paths` restricts the request path; absent paths fall back
/// to the default derived-secret API path requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebBasedApplicationIdentity {
    /// Host name, optionally prefixed with `"*."`.
    pub host: String,
    /// Permitted path requirements; `None` means the default path rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
}

/// Constraints on which callers may use a derived value.
///
/// Implemented by both [`Recipe`] and [`UnsealingInstructions`] so the
/// evaluator is written once against the trait.
pub trait AuthenticationRequirements {
    /// Origins permitted to use the derived value. `None` means no origin
    /// restriction was specified (callers decide whether that is fatal).
    fn allow(&self) -> Option<&[WebBasedApplicationIdentity]>;

    /// Whether the caller must have completed an authentication handshake.
    fn require_authentication_handshake(&self) -> bool;

    /// Android package-name prefixes permitted to use the derived value.
    fn allow_android_prefixes(&self) -> Option<&[String]>;
}

/// What kind of object a recipe derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivableObjectType {
    /// A word-list password.
    Password,
    /// Raw secret bytes.
    Secret,
    /// An Ed25519 signing key pair.
    SigningKey,
    /// A symmetric sealing/unsealing key.
    SymmetricKey,
    /// An asymmetric sealing/unsealing key pair.
    UnsealingKey,
}

/// Hash function used to stretch the seed during derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashFunction {
    /// Fast keyed hash (the default).
    BLAKE2b,
    /// Memory-hard hash for brute-force resistance.
    Argon2id,
}

/// Derivation options: what to derive and under which constraints.
///
/// A recipe is uniquely identified, for hashing purposes, by its canonical
/// JSON string (see [`crate::canonical`]). Two recipes with the same
/// semantic content and different field order are the same recipe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Origins permitted to request this derivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<WebBasedApplicationIdentity>>,

    /// Whether a handshake-validated caller is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_authentication_handshake: Option<bool>,

    /// Android package-name prefixes permitted to request this derivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_android_prefixes: Option<Vec<String>>,

    /// What kind of object this recipe derives.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<DerivableObjectType>,

    /// Hint shown to the user identifying which seed was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_hint: Option<String>,

    /// The four corner letters of the DiceKey, as a seed hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_letters: Option<String>,

    /// Proof that this recipe was previously used with this seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_of_prior_derivation: Option<String>,

    /// Whether the client may receive the raw derived key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_may_retrieve_key: Option<bool>,

    /// Derive from the seed with die orientations stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_orientation_of_faces: Option<bool>,

    /// Hash function used during derivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_function: Option<HashFunction>,

    /// Memory limit for memory-hard hash functions, in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_function_memory_limit_in_bytes: Option<u64>,

    /// Number of memory passes for memory-hard hash functions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_function_memory_passes: Option<u32>,

    /// Length of the derived secret, in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_in_bytes: Option<u32>,

    /// Length of a derived password, in words.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_in_words: Option<u32>,

    /// Strength of a derived password, in bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_in_bits: Option<u32>,

    /// Named word list used for password encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_list: Option<String>,

    /// Sequence number distinguishing successive derivations for the same
    /// purpose. Serialized as `"#"` and canonically ordered last.
    #[serde(rename = "#", skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
}

impl Recipe {
    /// Parse recipe JSON.
    ///
    /// `None` or an empty string yields the all-unset recipe. That recipe
    /// carries no restrictions at all, so callers may only use it where
    /// they have separately proven it safe (public-key commands).
    ///
    /// # Errors
    ///
    /// `RecipeError::InvalidRecipeJson` if the JSON is malformed.
    pub fn parse(json: Option<&str>) -> Result<Self, RecipeError> {
        match json {
            None => Ok(Self::default()),
            Some(s) if s.trim().is_empty() => Ok(Self::default()),
            Some(s) => {
                serde_json::from_str(s).map_err(|e| RecipeError::InvalidRecipeJson(e.to_string()))
            },
        }
    }
}

impl AuthenticationRequirements for Recipe {
    fn allow(&self) -> Option<&[WebBasedApplicationIdentity]> {
        self.allow.as_deref()
    }

    fn require_authentication_handshake(&self) -> bool {
        self.require_authentication_handshake.unwrap_or(false)
    }

    fn allow_android_prefixes(&self) -> Option<&[String]> {
        self.allow_android_prefixes.as_deref()
    }
}

/// Constraints on decrypting a specific ciphertext.
///
/// Carried inside a packaged sealed message. Distinct from "no
/// instructions": an absent instructions field is represented as `None`
/// at the call site, never as an all-unset instance, because the two
/// default differently during authorization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsealingInstructions {
    /// Origins permitted to unseal the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<WebBasedApplicationIdentity>>,

    /// Whether a handshake-validated caller is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_authentication_handshake: Option<bool>,

    /// Android package-name prefixes permitted to unseal the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_android_prefixes: Option<Vec<String>>,
}

impl UnsealingInstructions {
    /// Parse unsealing instructions JSON.
    ///
    /// # Errors
    ///
    /// `RecipeError::InvalidUnsealingInstructions` if the JSON is
    /// malformed.
    pub fn parse(json: &str) -> Result<Self, RecipeError> {
        serde_json::from_str(json)
            .map_err(|e| RecipeError::InvalidUnsealingInstructions(e.to_string()))
    }
}

impl AuthenticationRequirements for UnsealingInstructions {
    fn allow(&self) -> Option<&[WebBasedApplicationIdentity]> {
        self.allow.as_deref()
    }

    fn require_authentication_handshake(&self) -> bool {
        self.require_authentication_handshake.unwrap_or(false)
    }

    fn allow_android_prefixes(&self) -> Option<&[String]> {
        self.allow_android_prefixes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_none_yields_unset_recipe() {
        let recipe = Recipe::parse(None).expect("should parse");
        assert_eq!(recipe, Recipe::default());
        assert!(recipe.allow.is_none());
    }

    #[test]
    fn parse_empty_string_yields_unset_recipe() {
        let recipe = Recipe::parse(Some("")).expect("should parse");
        assert_eq!(recipe, Recipe::default());

        let recipe = Recipe::parse(Some("  ")).expect("should parse");
        assert_eq!(recipe, Recipe::default());
    }

    #[test]
    fn parse_malformed_recipe_fails() {
        let result = Recipe::parse(Some("{not json"));
        assert!(matches!(result, Err(RecipeError::InvalidRecipeJson(_))));
    }

    #[test]
    fn parse_full_recipe() {
        let json = r##"{
            "type": "Password",
            "allow": [{"host": "*.example.com"}],
            "lengthInWords": 13,
            "clientMayRetrieveKey": true,
            "#": 3
        }"##;
        let recipe = Recipe::parse(Some(json)).expect("should parse");

        assert_eq!(recipe.object_type, Some(DerivableObjectType::Password));
        assert_eq!(recipe.length_in_words, Some(13));
        assert_eq!(recipe.client_may_retrieve_key, Some(true));
        assert_eq!(recipe.sequence_number, Some(3));

        let allow = recipe.allow.as_ref().expect("allow present");
        assert_eq!(allow.len(), 1);
        assert_eq!(allow[0].host, "*.example.com");
        assert!(allow[0].paths.is_none());
    }

    #[test]
    fn sequence_number_round_trips_as_hash_key() {
        let recipe = Recipe { sequence_number: Some(2), ..Recipe::default() };
        let json = serde_json::to_string(&recipe).expect("should serialize");
        assert_eq!(json, r##"{"#":2}"##);

        let parsed = Recipe::parse(Some(&json)).expect("should parse");
        assert_eq!(parsed.sequence_number, Some(2));
    }

    #[test]
    fn unset_fields_are_not_serialized() {
        let json = serde_json::to_string(&Recipe::default()).expect("should serialize");
        assert_eq!(json, "{}");
    }

    #[test]
    fn instructions_parse_and_default_distinctly() {
        let parsed = UnsealingInstructions::parse(r#"{"allow":[{"host":"example.com"}]}"#)
            .expect("should parse");
        assert!(parsed.allow.is_some());

        // An all-unset instructions object is NOT how "no instructions" is
        // represented; absent instructions stay None at the call site.
        let empty = UnsealingInstructions::parse("{}").expect("should parse");
        assert_eq!(empty, UnsealingInstructions::default());
    }

    #[test]
    fn malformed_instructions_fail() {
        let result = UnsealingInstructions::parse("not json");
        assert!(matches!(result, Err(RecipeError::InvalidUnsealingInstructions(_))));
    }

    #[test]
    fn requirements_trait_defaults() {
        let recipe = Recipe::default();
        assert!(!recipe.require_authentication_handshake());
        assert!(AuthenticationRequirements::allow(&recipe).is_none());
        assert!(recipe.allow_android_prefixes().is_none());
    }
}
