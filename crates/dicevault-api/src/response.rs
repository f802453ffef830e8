//! Response payloads returned over the response channel.
//!
//! Each command has exactly one success shape. Responses travel back as
//! flat name/value parameters mirroring the inbound format; binary
//! fields (signatures, plaintext) are base64url, derived objects are
//! their JSON envelopes.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::ApiError;

/// The success payload for a completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// A signature over the request's message, with the verification key
    /// so the caller can check it locally.
    GenerateSignature {
        /// The 64-byte Ed25519 signature.
        signature: Vec<u8>,
        /// JSON envelope of the verification key.
        signature_verification_key_json: String,
    },
    /// A derived password's JSON envelope.
    GetPassword {
        /// JSON envelope of the password.
        password_json: String,
    },
    /// A derived secret's JSON envelope.
    GetSecret {
        /// JSON envelope of the secret.
        secret_json: String,
    },
    /// A derived sealing (public) key's JSON envelope.
    GetSealingKey {
        /// JSON envelope of the sealing key.
        sealing_key_json: String,
    },
    /// A derived signature-verification (public) key's JSON envelope.
    GetSignatureVerificationKey {
        /// JSON envelope of the verification key.
        signature_verification_key_json: String,
    },
    /// A derived signing key's JSON envelope (raw key material).
    GetSigningKey {
        /// JSON envelope of the signing key.
        signing_key_json: String,
    },
    /// A derived symmetric key's JSON envelope (raw key material).
    GetSymmetricKey {
        /// JSON envelope of the symmetric key.
        symmetric_key_json: String,
    },
    /// A derived unsealing key's JSON envelope (raw key material).
    GetUnsealingKey {
        /// JSON envelope of the unsealing key.
        unsealing_key_json: String,
    },
    /// A packaged sealed message produced by sealing.
    SealWithSymmetricKey {
        /// JSON envelope of the packaged sealed message.
        packaged_sealed_message_json: String,
    },
    /// Plaintext recovered with a symmetric key.
    UnsealWithSymmetricKey {
        /// The recovered plaintext.
        plaintext: Vec<u8>,
    },
    /// Plaintext recovered with an unsealing key.
    UnsealWithUnsealingKey {
        /// The recovered plaintext.
        plaintext: Vec<u8>,
    },
}

impl ApiResponse {
    /// Render the success payload as response-channel parameters.
    #[must_use]
    pub fn to_parameters(&self, request_id: &str) -> Vec<(String, String)> {
        let mut parameters = vec![("requestId".to_string(), request_id.to_string())];
        match self {
            Self::GenerateSignature { signature, signature_verification_key_json } => {
                parameters.push(("signature".to_string(), URL_SAFE_NO_PAD.encode(signature)));
                parameters.push((
                    "signatureVerificationKeyJson".to_string(),
                    signature_verification_key_json.clone(),
                ));
            },
            Self::GetPassword { password_json } => {
                parameters.push(("passwordJson".to_string(), password_json.clone()));
            },
            Self::GetSecret { secret_json } => {
                parameters.push(("secretJson".to_string(), secret_json.clone()));
            },
            Self::GetSealingKey { sealing_key_json } => {
                parameters.push(("sealingKeyJson".to_string(), sealing_key_json.clone()));
            },
            Self::GetSignatureVerificationKey { signature_verification_key_json } => {
                parameters.push((
                    "signatureVerificationKeyJson".to_string(),
                    signature_verification_key_json.clone(),
                ));
            },
            Self::GetSigningKey { signing_key_json } => {
                parameters.push(("signingKeyJson".to_string(), signing_key_json.clone()));
            },
            Self::GetSymmetricKey { symmetric_key_json } => {
                parameters.push(("symmetricKeyJson".to_string(), symmetric_key_json.clone()));
            },
            Self::GetUnsealingKey { unsealing_key_json } => {
                parameters.push(("unsealingKeyJson".to_string(), unsealing_key_json.clone()));
            },
            Self::SealWithSymmetricKey { packaged_sealed_message_json } => {
                parameters.push((
                    "packagedSealedMessageJson".to_string(),
                    packaged_sealed_message_json.clone(),
                ));
            },
            Self::UnsealWithSymmetricKey { plaintext }
            | Self::UnsealWithUnsealingKey { plaintext } => {
                parameters.push(("plaintext".to_string(), URL_SAFE_NO_PAD.encode(plaintext)));
            },
        }
        parameters
    }
}

/// Render an error as response-channel parameters.
#[must_use]
pub fn error_parameters(request_id: &str, error: &ApiError) -> Vec<(String, String)> {
    vec![
        ("requestId".to_string(), request_id.to_string()),
        ("exception".to_string(), error.exception_name().to_string()),
        ("message".to_string(), error.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(parameters: &'a [(String, String)], name: &str) -> Option<&'a str> {
        parameters.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    #[test]
    fn every_response_carries_the_request_id() {
        let response = ApiResponse::GetPassword { password_json: "{}".to_string() };
        let parameters = response.to_parameters("r-17");
        assert_eq!(value_of(&parameters, "requestId"), Some("r-17"));
        assert_eq!(value_of(&parameters, "passwordJson"), Some("{}"));
    }

    #[test]
    fn binary_fields_are_base64url() {
        let response = ApiResponse::UnsealWithSymmetricKey { plaintext: b"hello".to_vec() };
        let parameters = response.to_parameters("r");
        assert_eq!(value_of(&parameters, "plaintext"), Some("aGVsbG8"));
    }

    #[test]
    fn signature_response_includes_verification_key() {
        let response = ApiResponse::GenerateSignature {
            signature: vec![0u8; 4],
            signature_verification_key_json: r#"{"k":"v"}"#.to_string(),
        };
        let parameters = response.to_parameters("r");
        assert_eq!(value_of(&parameters, "signature"), Some("AAAAAA"));
        assert_eq!(value_of(&parameters, "signatureVerificationKeyJson"), Some(r#"{"k":"v"}"#));
    }

    #[test]
    fn errors_render_exception_and_message() {
        let error = ApiError::UserDeclined;
        let parameters = error_parameters("r-9", &error);
        assert_eq!(value_of(&parameters, "requestId"), Some("r-9"));
        assert_eq!(value_of(&parameters, "exception"), Some("UserDeclined"));
        assert_eq!(value_of(&parameters, "message"), Some("user declined the request"));
    }
}
