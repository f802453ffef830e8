//! Error taxonomy for the request lifecycle.
//!
//! Parse errors and authorization errors are fatal to the current
//! request and never retried; crypto errors pass through opaquely
//! (derivation is deterministic, so retrying identical inputs cannot
//! change the outcome). Every error maps to a stable `exception` name
//! for the response channel.

use thiserror::Error;

use dicevault_crypto::CryptoError;

/// Which requirements layer rejected an authorization check.
///
/// Used for user-facing messages and telemetry only; it never alters
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedBy {
    /// The recipe's own requirements rejected the caller.
    Recipe,
    /// The unsealing instructions attached to the sealed message
    /// rejected the caller.
    UnsealingInstructions,
}

/// Errors surfaced by request construction, authorization, or execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required inbound parameter was absent.
    #[error("required parameter not found: {0}")]
    ParameterNotFound(String),

    /// The `command` parameter is not one of the known command tags.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Recipe JSON could not be parsed.
    #[error("invalid recipe JSON")]
    InvalidRecipeJson,

    /// Packaged sealed message JSON could not be parsed.
    #[error("invalid packaged sealed message")]
    InvalidPackagedSealedMessage,

    /// The `respondTo` URL could not be parsed; the request has no
    /// response channel and fails silently.
    #[error("failed to parse reply-to URL: {0}")]
    FailedToParseReplyTo(String),

    /// The caller's origin does not satisfy the requirements.
    #[error("client not authorized by {rejected_by:?} requirements")]
    ClientNotAuthorized {
        /// Which layer rejected the caller.
        rejected_by: RejectedBy,
    },

    /// The command releases raw key material but the recipe does not set
    /// `clientMayRetrieveKey: true`.
    #[error("recipe must set clientMayRetrieveKey to true for this command")]
    RecipeRequiresClientMayRetrieveKey,

    /// The external consent step explicitly refused.
    #[error("user declined the request")]
    UserDeclined,

    /// A parameter's base64url payload could not be decoded.
    #[error("invalid base64url in parameter {0}")]
    InvalidBase64(String),

    /// Opaque failure from the seeded-crypto layer.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The background execution task failed to complete.
    #[error("execution task failed: {0}")]
    ExecutionFailure(String),
}

impl ApiError {
    /// Stable exception name for the `exception` response field.
    #[must_use]
    pub fn exception_name(&self) -> &'static str {
        match self {
            Self::ParameterNotFound(_) => "ParameterNotFound",
            Self::InvalidCommand(_) => "InvalidCommand",
            Self::InvalidRecipeJson => "InvalidRecipeJson",
            Self::InvalidPackagedSealedMessage => "InvalidPackagedSealedMessage",
            Self::FailedToParseReplyTo(_) => "FailedToParseReplyTo",
            Self::ClientNotAuthorized { rejected_by: RejectedBy::Recipe } => {
                "ClientNotAuthorizedDueToRecipe"
            },
            Self::ClientNotAuthorized { rejected_by: RejectedBy::UnsealingInstructions } => {
                "ClientNotAuthorizedDueToUnsealingInstructions"
            },
            Self::RecipeRequiresClientMayRetrieveKey => "RecipeRequiresClientMayRetrieveKey",
            Self::UserDeclined => "UserDeclined",
            Self::InvalidBase64(_) => "InvalidBase64",
            Self::Crypto(_) => "CryptoError",
            Self::ExecutionFailure(_) => "ExecutionFailure",
        }
    }
}
