//! Typed requests and the authorization gate.
//!
//! [`ApiRequest::from_parameters`] turns the flat inbound parameter set
//! into a typed request; [`ApiRequest::authorize`] consumes it and
//! yields an [`AuthorizedRequest`]. Execution only accepts the latter,
//! so no code path can reach a seed without passing every gate below,
//! in order:
//!
//! 1. parse the recipe (from the `recipe` parameter, or out of the
//!    packaged sealed message for unseal commands);
//! 2. parse the unsealing instructions, if any;
//! 3. the `clientMayRetrieveKey` gate for raw-key-export commands;
//! 4. the recipe's `allow` requirements against the caller's origin;
//! 5. the instructions' `allow` requirements against the caller's origin.

use url::Url;

use dicevault_crypto::PackagedSealedMessage;
use dicevault_recipe::{Recipe, SecurityContext, UnsealingInstructions, satisfies};

use crate::auth_token::AuthTokenStore;
use crate::command::Command;
use crate::error::{ApiError, RejectedBy};
use crate::parameters::RequestParameters;

/// The command-specific payload of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    /// No payload (the derive-and-return commands).
    None,
    /// The message to sign.
    Message(Vec<u8>),
    /// The plaintext to seal.
    Plaintext(Vec<u8>),
    /// The packaged sealed message to unseal.
    Sealed(PackagedSealedMessage),
}

/// A typed, not-yet-authorized request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// The requested command.
    pub command: Command,
    /// Caller-chosen identifier echoed back with the response.
    pub request_id: String,
    /// Where the response will be delivered.
    pub respond_to: Url,
    /// The caller's origin, as derived from `respond_to`.
    pub context: SecurityContext,
    /// Recipe JSON, as received (or extracted from the sealed message).
    pub recipe_json: Option<String>,
    /// Whether the caller permits the recipe to gain fields before
    /// derivation (defaulted per command). No gate here reads it; the
    /// consent UI that owns recipe edits consults it before applying
    /// [`dicevault_recipe::with_sequence_number`] and friends.
    pub recipe_may_be_modified: bool,
    /// Unsealing instructions to bind when sealing.
    pub unsealing_instructions_json: Option<String>,
    /// The command payload.
    pub payload: RequestPayload,
}

/// A request that has passed every authorization gate.
///
/// Only constructible through [`ApiRequest::authorize`].
#[derive(Debug, Clone)]
pub struct AuthorizedRequest {
    request: ApiRequest,
    sequence_number: Option<u64>,
}

impl ApiRequest {
    /// Build a typed request from the inbound parameter set.
    ///
    /// # Errors
    ///
    /// Missing or malformed parameters; an unparseable `respondTo` URL
    /// (`FailedToParseReplyTo` - such a request has no response channel
    /// and must fail without responding).
    pub fn from_parameters(
        parameters: &RequestParameters,
        tokens: &AuthTokenStore,
    ) -> Result<Self, ApiError> {
        let command: Command = parameters.required("command")?.parse()?;
        let request_id = parameters.required("requestId")?.to_string();

        let respond_to_raw = parameters.required("respondTo")?;
        let respond_to = Url::parse(respond_to_raw)
            .map_err(|_| ApiError::FailedToParseReplyTo(respond_to_raw.to_string()))?;
        let host = respond_to
            .host_str()
            .ok_or_else(|| ApiError::FailedToParseReplyTo(respond_to_raw.to_string()))?
            .to_string();

        let validated_by_auth_token = parameters
            .get("authToken")
            .is_some_and(|token| tokens.validates(token, respond_to_raw));
        let context = SecurityContext {
            host,
            path: respond_to.path().to_string(),
            validated_by_auth_token,
        };

        let recipe_may_be_modified = parameters
            .get_bool("recipeMayBeModified")
            .unwrap_or_else(|| command.recipe_may_be_modified_default());

        let (recipe_json, payload) = match command {
            Command::GenerateSignature => (
                parameters.get("recipe").map(str::to_string),
                RequestPayload::Message(parameters.required_bytes("message")?),
            ),
            Command::SealWithSymmetricKey => (
                parameters.get("recipe").map(str::to_string),
                RequestPayload::Plaintext(parameters.required_bytes("plaintext")?),
            ),
            Command::UnsealWithSymmetricKey | Command::UnsealWithUnsealingKey => {
                let sealed =
                    PackagedSealedMessage::from_json(parameters.required("packagedSealedMessageJson")?)
                        .map_err(|_| ApiError::InvalidPackagedSealedMessage)?;
                (Some(sealed.recipe_json.clone()), RequestPayload::Sealed(sealed))
            },
            _ => (parameters.get("recipe").map(str::to_string), RequestPayload::None),
        };

        Ok(Self {
            command,
            request_id,
            respond_to,
            context,
            recipe_json,
            recipe_may_be_modified,
            unsealing_instructions_json: parameters.get("unsealingInstructions").map(str::to_string),
            payload,
        })
    }

    /// Whether the recipe is absent or the empty string.
    fn recipe_is_nil_or_empty(&self) -> bool {
        self.recipe_json.as_deref().is_none_or(|json| json.trim().is_empty())
    }

    /// The unsealing instructions attached to a sealed payload, if any.
    fn sealed_instructions(&self) -> Option<&str> {
        match &self.payload {
            RequestPayload::Sealed(sealed) => sealed.unsealing_instructions.as_deref(),
            _ => None,
        }
    }

    /// Run every authorization gate, consuming the request.
    ///
    /// # Errors
    ///
    /// `InvalidRecipeJson` / `InvalidPackagedSealedMessage` on parse
    /// failures, `RecipeRequiresClientMayRetrieveKey` when a raw-key
    /// export lacks recipe consent, and `ClientNotAuthorized` naming the
    /// rejecting layer.
    pub fn authorize(self) -> Result<AuthorizedRequest, ApiError> {
        let recipe = Recipe::parse(self.recipe_json.as_deref())
            .map_err(|_| ApiError::InvalidRecipeJson)?;

        let instructions = self
            .sealed_instructions()
            .map(UnsealingInstructions::parse)
            .transpose()
            .map_err(|_| ApiError::InvalidPackagedSealedMessage)?;

        if self.command.requires_client_may_retrieve_key()
            && recipe.client_may_retrieve_key != Some(true)
        {
            tracing::warn!(
                command = %self.command,
                request_id = %self.request_id,
                "raw key export without clientMayRetrieveKey"
            );
            return Err(ApiError::RecipeRequiresClientMayRetrieveKey);
        }

        // An empty recipe carries no restrictions, so granting it is a
        // policy decision: public-key commands are safe to grant, and an
        // unseal may defer to instructions that carry their own allow
        // list. Everything else treats a missing allow list as a denial.
        let allow_null_for_recipe = (self.command.releases_only_public_key()
            && self.recipe_is_nil_or_empty())
            || (self.command.allow_nil_empty_recipe() && self.recipe_is_nil_or_empty())
            || (self.command.is_unseal()
                && instructions.as_ref().is_some_and(|i| i.allow.is_some()));

        if !satisfies(&self.context, &recipe, allow_null_for_recipe) {
            tracing::warn!(
                command = %self.command,
                request_id = %self.request_id,
                host = %self.context.host,
                "recipe requirements rejected caller"
            );
            return Err(ApiError::ClientNotAuthorized { rejected_by: RejectedBy::Recipe });
        }

        if let Some(instructions) = &instructions
            && !satisfies(&self.context, instructions, true)
        {
            tracing::warn!(
                command = %self.command,
                request_id = %self.request_id,
                host = %self.context.host,
                "unsealing instructions rejected caller"
            );
            return Err(ApiError::ClientNotAuthorized {
                rejected_by: RejectedBy::UnsealingInstructions,
            });
        }

        tracing::debug!(
            command = %self.command,
            request_id = %self.request_id,
            host = %self.context.host,
            "request authorized"
        );

        let sequence_number = recipe.sequence_number;
        Ok(AuthorizedRequest { request: self, sequence_number })
    }
}

impl AuthorizedRequest {
    /// The underlying request.
    #[must_use]
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// The recipe's sequence number, used for cache keying.
    #[must_use]
    pub fn sequence_number(&self) -> Option<u64> {
        self.sequence_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RequestParameters {
        RequestParameters::from_pairs(pairs.iter().copied())
    }

    fn base_params(command: &str, recipe: &str) -> RequestParameters {
        params(&[
            ("command", command),
            ("requestId", "r-1"),
            ("respondTo", "https://app.example.com/--derived-secret-api--/handle"),
            ("recipe", recipe),
        ])
    }

    #[test]
    fn wildcard_host_recipe_authorizes_matching_caller() {
        let request = ApiRequest::from_parameters(
            &base_params("getPassword", r#"{"allow":[{"host":"*.example.com"}]}"#),
            &AuthTokenStore::new(),
        )
        .expect("builds");

        let authorized = request.authorize().expect("authorizes");
        assert_eq!(authorized.request().command, Command::GetPassword);
    }

    #[test]
    fn non_matching_host_is_rejected_by_recipe() {
        let request = ApiRequest::from_parameters(
            &params(&[
                ("command", "getPassword"),
                ("requestId", "r-1"),
                ("respondTo", "https://evil.example.org/--derived-secret-api--/handle"),
                ("recipe", r#"{"allow":[{"host":"*.example.com"}]}"#),
            ]),
            &AuthTokenStore::new(),
        )
        .expect("builds");

        assert_eq!(
            request.authorize().map(|_| ()),
            Err(ApiError::ClientNotAuthorized { rejected_by: RejectedBy::Recipe })
        );
    }

    #[test]
    fn recipe_without_allow_denies_by_default() {
        let request = ApiRequest::from_parameters(
            &base_params("getPassword", r#"{"lengthInWords":13}"#),
            &AuthTokenStore::new(),
        )
        .expect("builds");

        assert_eq!(
            request.authorize().map(|_| ()),
            Err(ApiError::ClientNotAuthorized { rejected_by: RejectedBy::Recipe })
        );
    }

    #[test]
    fn raw_key_export_with_unrestricted_recipe_still_denies() {
        // Consent flag set, but no allow list: the recipe gate must fail
        // closed rather than treat "unrestricted" as "permitted".
        let request = ApiRequest::from_parameters(
            &base_params("getSigningKey", r#"{"clientMayRetrieveKey":true}"#),
            &AuthTokenStore::new(),
        )
        .expect("builds");

        assert_eq!(
            request.authorize().map(|_| ()),
            Err(ApiError::ClientNotAuthorized { rejected_by: RejectedBy::Recipe })
        );
    }

    #[test]
    fn public_key_commands_pass_with_empty_recipe() {
        for command in ["getSealingKey", "getSignatureVerificationKey"] {
            let request = ApiRequest::from_parameters(
                &base_params(command, ""),
                &AuthTokenStore::new(),
            )
            .expect("builds");
            assert!(request.authorize().is_ok(), "{command} should pass with empty recipe");
        }
    }

    #[test]
    fn raw_key_export_requires_client_may_retrieve_key() {
        let denied = ApiRequest::from_parameters(
            &base_params("getSigningKey", r#"{"allow":[{"host":"*.example.com"}]}"#),
            &AuthTokenStore::new(),
        )
        .expect("builds");
        assert_eq!(
            denied.authorize().map(|_| ()),
            Err(ApiError::RecipeRequiresClientMayRetrieveKey)
        );

        let granted = ApiRequest::from_parameters(
            &base_params(
                "getSigningKey",
                r#"{"allow":[{"host":"*.example.com"}],"clientMayRetrieveKey":true}"#,
            ),
            &AuthTokenStore::new(),
        )
        .expect("builds");
        assert!(granted.authorize().is_ok());
    }

    #[test]
    fn signature_request_decodes_its_message() {
        let mut pairs = vec![
            ("command", "generateSignature"),
            ("requestId", "r-1"),
            ("respondTo", "https://app.example.com/--derived-secret-api--/handle"),
            ("recipe", r#"{"allow":[{"host":"*.example.com"}]}"#),
            ("message", "aGVsbG8"),
        ];
        let request = ApiRequest::from_parameters(&params(&pairs), &AuthTokenStore::new())
            .expect("builds");
        assert_eq!(request.payload, RequestPayload::Message(b"hello".to_vec()));

        pairs.retain(|(k, _)| *k != "message");
        assert_eq!(
            ApiRequest::from_parameters(&params(&pairs), &AuthTokenStore::new()).map(|_| ()),
            Err(ApiError::ParameterNotFound("message".to_string()))
        );
    }

    #[test]
    fn unparseable_respond_to_fails() {
        let request = ApiRequest::from_parameters(
            &params(&[
                ("command", "getPassword"),
                ("requestId", "r-1"),
                ("respondTo", "not a url"),
                ("recipe", "{}"),
            ]),
            &AuthTokenStore::new(),
        );
        assert!(matches!(request, Err(ApiError::FailedToParseReplyTo(_))));
    }

    #[test]
    fn handshake_recipe_requires_validated_token() {
        let recipe =
            r#"{"allow":[{"host":"*.example.com"}],"requireAuthenticationHandshake":true}"#;
        let respond_to = "https://app.example.com/--derived-secret-api--/handle";

        let without_token =
            ApiRequest::from_parameters(&base_params("getPassword", recipe), &AuthTokenStore::new())
                .expect("builds");
        assert!(without_token.authorize().is_err());

        let mut tokens = AuthTokenStore::new();
        let token = tokens.issue(respond_to);
        let with_token = ApiRequest::from_parameters(
            &params(&[
                ("command", "getPassword"),
                ("requestId", "r-1"),
                ("respondTo", respond_to),
                ("recipe", recipe),
                ("authToken", &token),
            ]),
            &tokens,
        )
        .expect("builds");
        assert!(with_token.authorize().is_ok());
    }

    #[test]
    fn sequence_number_is_extracted_for_caching() {
        let request = ApiRequest::from_parameters(
            &base_params("getPassword", r##"{"allow":[{"host":"*.example.com"}],"#":7}"##),
            &AuthTokenStore::new(),
        )
        .expect("builds");
        let authorized = request.authorize().expect("authorizes");
        assert_eq!(authorized.sequence_number(), Some(7));
    }
}
