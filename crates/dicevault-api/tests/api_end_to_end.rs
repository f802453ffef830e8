//! End-to-end request lifecycle tests: inbound parameters through
//! authorization, execution, and the response channel.
//!
//! Cache behavior at the lifecycle level (memoization, supersession) is
//! covered by unit tests in `lifecycle.rs`; these tests exercise the
//! full path a real client request takes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dicevault_api::{
    ApiError, ApiRequest, ApiResponse, AuthTokenStore, Command, CommandExecutor, RejectedBy,
    RequestLifecycle, RequestParameters, SeededCryptoExecutor, error_parameters,
};
use dicevault_crypto::{Password, PackagedSealedMessage};
use dicevault_dice::DiceKey;

/// One fixed scan of a DiceKey; tests derive their seed from it the way
/// the consent flow would, via the canonical rotation.
const SCANNED_READING: &str =
    "A1tB2rC3bD4lE5tF6rG1bH2lI3tJ4rK5bL6lM1tN2rO3bP4lR5tS6rT1bU2lV3tW4rX5bY6lZ1t";
const RESPOND_TO: &str = "https://vault.example.com/--derived-secret-api--/handle";

fn seed() -> String {
    DiceKey::from_human_readable(SCANNED_READING).expect("valid reading").to_seed(true)
}

fn parameters(pairs: &[(&str, &str)]) -> RequestParameters {
    RequestParameters::from_pairs(pairs.iter().copied())
}

fn value_of<'a>(rendered: &'a [(String, String)], name: &str) -> Option<&'a str> {
    rendered.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn get_password_end_to_end() {
    let recipe = r#"{"allow":[{"host":"*.example.com"}],"lengthInWords":6}"#;
    let request = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "getPassword"),
            ("requestId", "pw-1"),
            ("respondTo", RESPOND_TO),
            ("recipe", recipe),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds");
    assert_eq!(request.command, Command::GetPassword);

    let authorized = request.authorize().expect("wildcard host matches");
    let response = RequestLifecycle::new().execute(&authorized, &seed()).await.expect("executes");

    let ApiResponse::GetPassword { password_json } = &response else {
        panic!("wrong response shape");
    };
    let password = Password::from_json(password_json).expect("parses");
    assert!(password.password.starts_with("6-"));
    assert_eq!(password.password.matches('-').count(), 6);

    // The password derives from the canonical recipe form, so the
    // envelope's recipe has deterministic key order.
    assert!(password.recipe.starts_with(r#"{"allow""#));

    let rendered = response.to_parameters("pw-1");
    assert_eq!(value_of(&rendered, "requestId"), Some("pw-1"));
    assert_eq!(value_of(&rendered, "passwordJson"), Some(password_json.as_str()));
}

#[test]
fn get_signing_key_denies_by_default() {
    // No clientMayRetrieveKey in the recipe: raw key export must fail
    // even though the host matches.
    let request = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "getSigningKey"),
            ("requestId", "sk-1"),
            ("respondTo", RESPOND_TO),
            ("recipe", r#"{"allow":[{"host":"vault.example.com"}]}"#),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds");

    let error = request.authorize().map(|_| ()).expect_err("must deny");
    assert_eq!(error, ApiError::RecipeRequiresClientMayRetrieveKey);

    let rendered = error_parameters("sk-1", &error);
    assert_eq!(value_of(&rendered, "requestId"), Some("sk-1"));
    assert_eq!(value_of(&rendered, "exception"), Some("RecipeRequiresClientMayRetrieveKey"));
}

#[tokio::test]
async fn seal_then_unseal_round_trips_through_the_api() {
    let recipe = r#"{"allow":[{"host":"*.example.com"}]}"#;
    let lifecycle = RequestLifecycle::new();

    let seal = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "sealWithSymmetricKey"),
            ("requestId", "seal-1"),
            ("respondTo", RESPOND_TO),
            ("recipe", recipe),
            ("plaintext", "c2VjcmV0IG5vdGU"),
            ("unsealingInstructions", r#"{"allow":[{"host":"*.example.com"}]}"#),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds")
    .authorize()
    .expect("authorizes");

    let seed = seed();
    let sealed_response = lifecycle.execute(&seal, &seed).await.expect("seals");
    let ApiResponse::SealWithSymmetricKey { packaged_sealed_message_json } = &sealed_response
    else {
        panic!("wrong response shape");
    };
    let package =
        PackagedSealedMessage::from_json(packaged_sealed_message_json).expect("parses");
    assert!(package.unsealing_instructions.is_some());

    let unseal = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "unsealWithSymmetricKey"),
            ("requestId", "unseal-1"),
            ("respondTo", RESPOND_TO),
            ("packagedSealedMessageJson", packaged_sealed_message_json),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds")
    .authorize()
    .expect("instructions allow this host");

    let response = lifecycle.execute(&unseal, &seed).await.expect("unseals");
    assert_eq!(
        response,
        ApiResponse::UnsealWithSymmetricKey { plaintext: b"secret note".to_vec() }
    );
}

#[test]
fn unsealing_instructions_bind_the_audience() {
    // Seal under instructions restricted to example.com; a caller from
    // another origin passes the recipe gate (instructions carry their
    // own allow) but fails the instructions gate.
    let key = dicevault_crypto::SymmetricKey::derive_from_seed(&seed(), "{}").expect("derives");
    let package = key
        .seal(b"for example.com only", Some(r#"{"allow":[{"host":"*.example.com"}]}"#))
        .expect("seals");
    let package_json = package.to_json().expect("serializes");

    let request = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "unsealWithSymmetricKey"),
            ("requestId", "unseal-2"),
            ("respondTo", "https://intruder.example.org/--derived-secret-api--/handle"),
            ("packagedSealedMessageJson", &package_json),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds");

    assert_eq!(
        request.authorize().map(|_| ()),
        Err(ApiError::ClientNotAuthorized { rejected_by: RejectedBy::UnsealingInstructions })
    );
}

#[tokio::test]
async fn public_key_commands_need_no_recipe_and_still_memoize() {
    struct Counting {
        calls: AtomicUsize,
        inner: SeededCryptoExecutor,
    }
    impl CommandExecutor for Counting {
        fn execute(&self, request: &ApiRequest, seed: &str) -> Result<ApiResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.execute(request, seed)
        }
    }

    let executor = Arc::new(Counting { calls: AtomicUsize::new(0), inner: SeededCryptoExecutor });
    let lifecycle = RequestLifecycle::with_executor(Arc::clone(&executor) as Arc<dyn CommandExecutor>);

    let authorized = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "getSealingKey"),
            ("requestId", "pub-1"),
            ("respondTo", RESPOND_TO),
            ("recipe", ""),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds")
    .authorize()
    .expect("empty recipe is fine for public keys");

    let seed = seed();
    let first = lifecycle.execute(&authorized, &seed).await.expect("executes");
    let second = lifecycle.execute(&authorized, &seed).await.expect("executes");
    assert_eq!(first, second);
    assert_eq!(executor.calls.load(Ordering::SeqCst), 1, "second call must be memoized");
}

#[tokio::test]
async fn generate_signature_response_verifies() {
    let authorized = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "generateSignature"),
            ("requestId", "sig-1"),
            ("respondTo", RESPOND_TO),
            ("recipe", r#"{"allow":[{"host":"vault.example.com"}]}"#),
            ("message", "dG8gYmUgc2lnbmVk"),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds")
    .authorize()
    .expect("authorizes");

    let response = RequestLifecycle::new().execute(&authorized, &seed()).await.expect("signs");
    let ApiResponse::GenerateSignature { signature, signature_verification_key_json } = response
    else {
        panic!("wrong response shape");
    };
    let verification =
        dicevault_crypto::SignatureVerificationKey::from_json(&signature_verification_key_json)
            .expect("parses");
    assert!(verification.verify(b"to be signed", &signature).expect("verifies"));
    assert!(!verification.verify(b"tampered", &signature).expect("verifies"));
}

#[test]
fn legacy_parameter_names_still_work() {
    let request = ApiRequest::from_parameters(
        &parameters(&[
            ("command", "getSecret"),
            ("requestId", "legacy-1"),
            ("replyTo", RESPOND_TO),
            ("derivationOptionsJson", r#"{"allow":[{"host":"vault.example.com"}]}"#),
        ]),
        &AuthTokenStore::new(),
    )
    .expect("builds");

    assert!(request.authorize().is_ok());
}
