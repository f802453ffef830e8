//! DiceVault request lifecycle.
//!
//! The path from an inbound parameter set to released key material is a
//! chain of security decisions: parse the command, type the request,
//! canonicalize and parse its recipe, evaluate the caller's origin
//! against the recipe's (and any unsealing instructions') requirements,
//! and only then - once the external consent flow supplies a seed -
//! execute against the seeded-crypto layer and memoize the result.
//!
//! The lifecycle is a typestate: [`ApiRequest::authorize`] consumes the
//! request and yields an [`AuthorizedRequest`], and
//! [`RequestLifecycle::execute`] only accepts the latter, so a seed can
//! never meet a request that has not passed authorization.
//!
//! # Invariants
//!
//! - Raw signing/symmetric/unsealing keys are released only when the
//!   recipe sets `clientMayRetrieveKey: true`.
//! - A cached result is served only for the exact `(seed, sequence
//!   number)` pair that produced it; anything else recomputes.
//! - A superseded in-flight execution never overwrites a newer request's
//!   cache slot.

pub mod auth_token;
pub mod cache;
pub mod command;
pub mod error;
pub mod lifecycle;
pub mod parameters;
pub mod request;
pub mod response;

pub use auth_token::AuthTokenStore;
pub use cache::{ResultCache, cache_key, execution_fingerprint};
pub use command::Command;
pub use error::{ApiError, RejectedBy};
pub use lifecycle::{CommandExecutor, RequestLifecycle, SeededCryptoExecutor};
pub use parameters::RequestParameters;
pub use request::{ApiRequest, AuthorizedRequest, RequestPayload};
pub use response::{ApiResponse, error_parameters};
