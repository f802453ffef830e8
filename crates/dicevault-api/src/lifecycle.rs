//! Execution of authorized requests against the seeded-crypto layer.
//!
//! Derivation is CPU-bound (Argon2id in particular), so execution runs
//! on [`tokio::task::spawn_blocking`] rather than on the caller's async
//! thread. Results are memoized through [`ResultCache`] keyed by
//! `(request id, sequence number)` and fingerprinted by
//! `(seed, sequence number)`, so re-presenting the same request with
//! the same seed never re-runs the derivation.
//!
//! The crypto dispatch sits behind [`CommandExecutor`] so tests can
//! substitute a counting or failing executor without touching the
//! lifecycle logic.

use std::sync::Arc;

use tokio::sync::Mutex;

use dicevault_crypto::{Password, Secret, SigningKey, SymmetricKey, UnsealingKey};

use crate::cache::{ResultCache, cache_key, execution_fingerprint};
use crate::command::Command;
use crate::error::ApiError;
use crate::request::{ApiRequest, AuthorizedRequest, RequestPayload};
use crate::response::ApiResponse;

/// Executes a single authorized command against a seed.
pub trait CommandExecutor: Send + Sync {
    /// Run the request's command, returning its success payload.
    ///
    /// # Errors
    ///
    /// Crypto failures pass through opaquely.
    fn execute(&self, request: &ApiRequest, seed: &str) -> Result<ApiResponse, ApiError>;
}

/// The production executor: dispatches to `dicevault-crypto`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeededCryptoExecutor;

fn message_of(request: &ApiRequest) -> Result<&[u8], ApiError> {
    match &request.payload {
        RequestPayload::Message(message) => Ok(message),
        _ => Err(ApiError::ParameterNotFound("message".to_string())),
    }
}

fn plaintext_of(request: &ApiRequest) -> Result<&[u8], ApiError> {
    match &request.payload {
        RequestPayload::Plaintext(plaintext) => Ok(plaintext),
        _ => Err(ApiError::ParameterNotFound("plaintext".to_string())),
    }
}

fn sealed_of(request: &ApiRequest) -> Result<&dicevault_crypto::PackagedSealedMessage, ApiError> {
    match &request.payload {
        RequestPayload::Sealed(sealed) => Ok(sealed),
        _ => Err(ApiError::ParameterNotFound("packagedSealedMessageJson".to_string())),
    }
}

impl CommandExecutor for SeededCryptoExecutor {
    fn execute(&self, request: &ApiRequest, seed: &str) -> Result<ApiResponse, ApiError> {
        let recipe_json = request.recipe_json.as_deref().unwrap_or("");

        match request.command {
            Command::GenerateSignature => {
                let signing = SigningKey::derive_from_seed(seed, recipe_json)?;
                Ok(ApiResponse::GenerateSignature {
                    signature: signing.generate_signature(message_of(request)?)?,
                    signature_verification_key_json: signing.verification_key()?.to_json()?,
                })
            },
            Command::GetPassword => Ok(ApiResponse::GetPassword {
                password_json: Password::derive_from_seed(seed, recipe_json)?.to_json()?,
            }),
            Command::GetSecret => Ok(ApiResponse::GetSecret {
                secret_json: Secret::derive_from_seed(seed, recipe_json)?.to_json()?,
            }),
            Command::GetSealingKey => Ok(ApiResponse::GetSealingKey {
                sealing_key_json: UnsealingKey::derive_from_seed(seed, recipe_json)?
                    .sealing_key()?
                    .to_json()?,
            }),
            Command::GetSignatureVerificationKey => Ok(ApiResponse::GetSignatureVerificationKey {
                signature_verification_key_json: SigningKey::derive_from_seed(seed, recipe_json)?
                    .verification_key()?
                    .to_json()?,
            }),
            Command::GetSigningKey => Ok(ApiResponse::GetSigningKey {
                signing_key_json: SigningKey::derive_from_seed(seed, recipe_json)?.to_json()?,
            }),
            Command::GetSymmetricKey => Ok(ApiResponse::GetSymmetricKey {
                symmetric_key_json: SymmetricKey::derive_from_seed(seed, recipe_json)?.to_json()?,
            }),
            Command::GetUnsealingKey => Ok(ApiResponse::GetUnsealingKey {
                unsealing_key_json: UnsealingKey::derive_from_seed(seed, recipe_json)?.to_json()?,
            }),
            Command::SealWithSymmetricKey => {
                let key = SymmetricKey::derive_from_seed(seed, recipe_json)?;
                let sealed = key.seal(
                    plaintext_of(request)?,
                    request.unsealing_instructions_json.as_deref(),
                )?;
                Ok(ApiResponse::SealWithSymmetricKey {
                    packaged_sealed_message_json: sealed.to_json()?,
                })
            },
            Command::UnsealWithSymmetricKey => {
                let sealed = sealed_of(request)?;
                let key = SymmetricKey::derive_from_seed(seed, &sealed.recipe_json)?;
                Ok(ApiResponse::UnsealWithSymmetricKey { plaintext: key.unseal(sealed)? })
            },
            Command::UnsealWithUnsealingKey => {
                let sealed = sealed_of(request)?;
                let key = UnsealingKey::derive_from_seed(seed, &sealed.recipe_json)?;
                Ok(ApiResponse::UnsealWithUnsealingKey { plaintext: key.unseal(sealed)? })
            },
        }
    }
}

/// Drives authorized requests to completion with memoization.
#[derive(Clone)]
pub struct RequestLifecycle {
    cache: Arc<Mutex<ResultCache>>,
    executor: Arc<dyn CommandExecutor>,
}

impl RequestLifecycle {
    /// A lifecycle backed by the production crypto executor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(Arc::new(SeededCryptoExecutor))
    }

    /// A lifecycle backed by a caller-supplied executor.
    #[must_use]
    pub fn with_executor(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { cache: Arc::new(Mutex::new(ResultCache::new())), executor }
    }

    /// Execute an authorized request against a seed.
    ///
    /// Serves from the cache when this request id was already executed
    /// under the same `(seed, sequence number)`; otherwise runs the
    /// command on a blocking thread and memoizes the outcome. A stale
    /// execution superseded by a newer one for the same request id
    /// discards its result instead of committing it.
    ///
    /// # Errors
    ///
    /// Crypto and payload errors from the executor, or
    /// `ExecutionFailure` if the blocking task itself failed.
    pub async fn execute(
        &self,
        authorized: &AuthorizedRequest,
        seed: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = authorized.request();
        let sequence = authorized.sequence_number();
        let key = cache_key(&request.request_id, sequence);
        let fingerprint = execution_fingerprint(seed, sequence);

        {
            let mut cache = self.cache.lock().await;
            if let Some(result) = cache.lookup(&key, &fingerprint) {
                tracing::debug!(request_id = %request.request_id, "serving memoized result");
                return result;
            }
            cache.begin(key, fingerprint);
        }

        let executor = Arc::clone(&self.executor);
        let owned_request = request.clone();
        let owned_seed = seed.to_string();
        let result = tokio::task::spawn_blocking(move || {
            executor.execute(&owned_request, &owned_seed)
        })
        .await
        .map_err(|e| ApiError::ExecutionFailure(e.to_string()))?;

        let mut cache = self.cache.lock().await;
        if cache.commit(&key, &fingerprint, result.clone()) {
            tracing::info!(
                request_id = %request.request_id,
                command = %request.command,
                ok = result.is_ok(),
                "execution complete"
            );
        } else {
            tracing::debug!(
                request_id = %request.request_id,
                "execution superseded; discarding result"
            );
        }
        result
    }
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::auth_token::AuthTokenStore;
    use crate::parameters::RequestParameters;

    const SEED: &str = "A1tB2rC3bD4lE5tF6rG1bH2lI3tJ4rK5bL6lM1tN2rO3bP4lR5t";

    /// Counts executions while delegating to the real crypto.
    struct CountingExecutor {
        calls: AtomicUsize,
        inner: SeededCryptoExecutor,
    }

    impl CountingExecutor {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), inner: SeededCryptoExecutor })
        }
    }

    impl CommandExecutor for CountingExecutor {
        fn execute(&self, request: &ApiRequest, seed: &str) -> Result<ApiResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.execute(request, seed)
        }
    }

    fn authorized_request(request_id: &str, recipe: &str) -> AuthorizedRequest {
        let parameters = RequestParameters::from_pairs([
            ("command", "getPassword"),
            ("requestId", request_id),
            ("respondTo", "https://app.example.com/--derived-secret-api--/handle"),
            ("recipe", recipe),
        ]);
        ApiRequest::from_parameters(&parameters, &AuthTokenStore::new())
            .expect("builds")
            .authorize()
            .expect("authorizes")
    }

    #[tokio::test]
    async fn repeated_requests_execute_once() {
        let executor = CountingExecutor::new();
        let lifecycle = RequestLifecycle::with_executor(Arc::clone(&executor) as Arc<_>);
        let request = authorized_request("r-1", r#"{"allow":[{"host":"*.example.com"}]}"#);

        let first = lifecycle.execute(&request, SEED).await.expect("executes");
        let second = lifecycle.execute(&request, SEED).await.expect("executes");

        assert_eq!(first, second);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_seed_recomputes() {
        let executor = CountingExecutor::new();
        let lifecycle = RequestLifecycle::with_executor(Arc::clone(&executor) as Arc<_>);
        let request = authorized_request("r-1", r#"{"allow":[{"host":"*.example.com"}]}"#);

        let first = lifecycle.execute(&request, SEED).await.expect("executes");
        let other_seed = "B1tA2rD3bC4lF5tE6rH1bG2lJ3tI4rL5bK6lN1tM2rP3bO4lS5t";
        let second = lifecycle.execute(&request, other_seed).await.expect("executes");

        assert_ne!(first, second);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn different_sequence_number_recomputes() {
        let executor = CountingExecutor::new();
        let lifecycle = RequestLifecycle::with_executor(Arc::clone(&executor) as Arc<_>);

        let first = authorized_request("r-1", r##"{"allow":[{"host":"*.example.com"}],"#":1}"##);
        let second = authorized_request("r-1", r##"{"allow":[{"host":"*.example.com"}],"#":2}"##);

        let a = lifecycle.execute(&first, SEED).await.expect("executes");
        let b = lifecycle.execute(&second, SEED).await.expect("executes");

        assert_ne!(a, b);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn default_executor_signs_and_verifies() {
        let parameters = RequestParameters::from_pairs([
            ("command", "generateSignature"),
            ("requestId", "r-sig"),
            ("respondTo", "https://app.example.com/--derived-secret-api--/handle"),
            ("recipe", r#"{"allow":[{"host":"*.example.com"}]}"#),
            ("message", "aGVsbG8"),
        ]);
        let authorized = ApiRequest::from_parameters(&parameters, &AuthTokenStore::new())
            .expect("builds")
            .authorize()
            .expect("authorizes");

        let lifecycle = RequestLifecycle::new();
        let response = lifecycle.execute(&authorized, SEED).await.expect("executes");

        let ApiResponse::GenerateSignature { signature, signature_verification_key_json } =
            response
        else {
            panic!("wrong response shape");
        };
        let verification = dicevault_crypto::SignatureVerificationKey::from_json(
            &signature_verification_key_json,
        )
        .expect("parses");
        assert!(verification.verify(b"hello", &signature).expect("verifies"));
    }
}
