//! The API command set and its per-command policy knobs.
//!
//! Each knob has command-specific defaults that encode the security
//! asymmetry of the API: public halves of key pairs can be released
//! freely, raw secret key material only with explicit recipe consent.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// The command tag of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Sign a message with a derived signing key.
    GenerateSignature,
    /// Derive a word-list password.
    GetPassword,
    /// Derive raw secret bytes.
    GetSecret,
    /// Derive and release the public sealing key.
    GetSealingKey,
    /// Derive and release the public signature-verification key.
    GetSignatureVerificationKey,
    /// Derive and release the raw signing key.
    GetSigningKey,
    /// Derive and release the raw symmetric key.
    GetSymmetricKey,
    /// Derive and release the raw unsealing key.
    GetUnsealingKey,
    /// Seal a plaintext with a derived symmetric key.
    SealWithSymmetricKey,
    /// Unseal a packaged message with a derived symmetric key.
    UnsealWithSymmetricKey,
    /// Unseal a packaged message with a derived unsealing key.
    UnsealWithUnsealingKey,
}

impl Command {
    /// All command tags, in wire-name order.
    pub const ALL: [Self; 11] = [
        Self::GenerateSignature,
        Self::GetPassword,
        Self::GetSecret,
        Self::GetSealingKey,
        Self::GetSignatureVerificationKey,
        Self::GetSigningKey,
        Self::GetSymmetricKey,
        Self::GetUnsealingKey,
        Self::SealWithSymmetricKey,
        Self::UnsealWithSymmetricKey,
        Self::UnsealWithUnsealingKey,
    ];

    /// Wire name of this command.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenerateSignature => "generateSignature",
            Self::GetPassword => "getPassword",
            Self::GetSecret => "getSecret",
            Self::GetSealingKey => "getSealingKey",
            Self::GetSignatureVerificationKey => "getSignatureVerificationKey",
            Self::GetSigningKey => "getSigningKey",
            Self::GetSymmetricKey => "getSymmetricKey",
            Self::GetUnsealingKey => "getUnsealingKey",
            Self::SealWithSymmetricKey => "sealWithSymmetricKey",
            Self::UnsealWithSymmetricKey => "unsealWithSymmetricKey",
            Self::UnsealWithUnsealingKey => "unsealWithUnsealingKey",
        }
    }

    /// Whether this command releases raw secret key material and so
    /// requires the recipe to set `clientMayRetrieveKey: true`.
    #[must_use]
    pub const fn requires_client_may_retrieve_key(self) -> bool {
        matches!(self, Self::GetSigningKey | Self::GetSymmetricKey | Self::GetUnsealingKey)
    }

    /// Whether an absent or empty recipe is acceptable at validation.
    ///
    /// Only unsealing with an unsealing key tolerates a message sealed
    /// under the unrestricted recipe; everything else fails closed.
    #[must_use]
    pub const fn allow_nil_empty_recipe(self) -> bool {
        matches!(self, Self::UnsealWithUnsealingKey)
    }

    /// Default for `recipeMayBeModified` when the caller does not say.
    ///
    /// Sealing operations may gain extra constraints over time without
    /// re-deriving a different key, so they default to modifiable.
    #[must_use]
    pub const fn recipe_may_be_modified_default(self) -> bool {
        matches!(self, Self::GetSealingKey | Self::SealWithSymmetricKey)
    }

    /// Whether this command only releases the public half of a key pair
    /// and so may pass authorization with an empty, unrestricted recipe.
    #[must_use]
    pub const fn releases_only_public_key(self) -> bool {
        matches!(self, Self::GetSealingKey | Self::GetSignatureVerificationKey)
    }

    /// Whether this command extracts its recipe from a packaged sealed
    /// message rather than a `recipe` parameter.
    #[must_use]
    pub const fn is_unseal(self) -> bool {
        matches!(self, Self::UnsealWithSymmetricKey | Self::UnsealWithUnsealingKey)
    }
}

impl FromStr for Command {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| ApiError::InvalidCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
