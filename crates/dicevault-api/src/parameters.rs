//! Inbound request parameters.
//!
//! Requests arrive as flat string key/value sets (query strings, intent
//! extras). Older clients use the `derivationOptionsJson` family of
//! names; both spellings of each parameter resolve to the same value.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::ApiError;

/// Alternate names accepted for a canonical parameter name.
const ALIASES: [(&str, &str); 3] = [
    ("recipe", "derivationOptionsJson"),
    ("recipeMayBeModified", "derivationOptionsJsonMayBeModified"),
    ("respondTo", "replyTo"),
];

/// A flat set of named string parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestParameters {
    values: HashMap<String, String>,
}

impl RequestParameters {
    /// Build a parameter set from name/value pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Look up a parameter by canonical name, falling back to its alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.values.get(name) {
            return Some(value);
        }
        ALIASES
            .iter()
            .find(|(canonical, _)| *canonical == name)
            .and_then(|(_, alias)| self.values.get(*alias))
            .map(String::as_str)
    }

    /// Look up a parameter that must be present.
    ///
    /// # Errors
    ///
    /// `ApiError::ParameterNotFound` naming the missing parameter.
    pub fn required(&self, name: &str) -> Result<&str, ApiError> {
        self.get(name).ok_or_else(|| ApiError::ParameterNotFound(name.to_string()))
    }

    /// Decode a required base64url parameter into bytes.
    ///
    /// # Errors
    ///
    /// `ApiError::ParameterNotFound` if absent, `ApiError::InvalidBase64`
    /// if present but undecodable.
    pub fn required_bytes(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        let encoded = self.required(name)?;
        URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|_| ApiError::InvalidBase64(name.to_string()))
    }

    /// Parse an optional boolean parameter (`"true"` / `"false"`).
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }
}
