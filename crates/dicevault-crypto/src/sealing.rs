//! Asymmetric sealing: X25519 sealed boxes over XChaCha20-Poly1305.
//!
//! The sealing key is public and may be handed to clients without
//! authorization; only the unsealing key can open what was sealed.
//! Ciphertext layout: `ephemeral_public_key(32) || aead_ciphertext`,
//! with the AEAD key and nonce derived from the ECDH shared secret and
//! both public keys.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::derivation::{derive_key_material, parse_and_canonicalize};
use crate::encoding::{from_base64url, to_base64url};
use crate::error::CryptoError;
use crate::packaged::PackagedSealedMessage;

/// X25519 key length.
const KEY_LENGTH: usize = 32;

/// Nonce length for the extended-nonce AEAD.
const NONCE_LENGTH: usize = 24;

/// Label bound into the sealed-box key schedule.
const SEALED_BOX_LABEL: &[u8] = b"dicevaultSealedBoxV1";

/// The public half of a derived sealing key pair.
///
/// Releasing this key requires no client authorization: it can only be
/// used to seal, never to unseal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealingKey {
    /// The 32-byte X25519 public key.
    pub sealing_key_bytes: Vec<u8>,
    /// Canonical recipe JSON used for derivation.
    pub recipe: String,
}

/// The secret half of a derived sealing key pair.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct UnsealingKey {
    /// The 32-byte X25519 secret key.
    pub unsealing_key_bytes: Vec<u8>,
    /// Canonical recipe JSON used for derivation.
    pub recipe: String,
}

/// JSON envelope for [`SealingKey`].
#[derive(Serialize, Deserialize)]
struct SealingKeyJson {
    #[serde(rename = "sealingKeyBytes")]
    sealing_key_bytes: String,
    recipe: String,
}

/// JSON envelope for [`UnsealingKey`].
#[derive(Serialize, Deserialize)]
struct UnsealingKeyJson {
    #[serde(rename = "unsealingKeyBytes")]
    unsealing_key_bytes: String,
    recipe: String,
}

/// Derive the AEAD key and nonce for a sealed box from the shared secret
/// and both public keys.
fn sealed_box_key_schedule(
    shared_secret: &[u8],
    ephemeral_public: &[u8; KEY_LENGTH],
    recipient_public: &[u8; KEY_LENGTH],
) -> Result<([u8; KEY_LENGTH], [u8; NONCE_LENGTH]), CryptoError> {
    let hkdf = Hkdf::<Sha256>::new(None, shared_secret);

    let mut info = Vec::with_capacity(SEALED_BOX_LABEL.len() + 2 * KEY_LENGTH);
    info.extend_from_slice(SEALED_BOX_LABEL);
    info.extend_from_slice(ephemeral_public);
    info.extend_from_slice(recipient_public);

    let mut okm = [0u8; KEY_LENGTH + NONCE_LENGTH];
    hkdf.expand(&info, &mut okm)
        .map_err(|_| CryptoError::DerivationFailure("sealed box key schedule".to_string()))?;

    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&okm[..KEY_LENGTH]);
    let mut nonce = [0u8; NONCE_LENGTH];
    nonce.copy_from_slice(&okm[KEY_LENGTH..]);
    Ok((key, nonce))
}

impl SealingKey {
    /// Seal a plaintext to the holder of the matching unsealing key.
    pub fn seal(
        &self,
        plaintext: &[u8],
        unsealing_instructions: Option<&str>,
    ) -> Result<PackagedSealedMessage, CryptoError> {
        let recipient_bytes: [u8; KEY_LENGTH] =
            self.sealing_key_bytes.as_slice().try_into().map_err(|_| {
                CryptoError::InvalidKeyLength {
                    expected: KEY_LENGTH,
                    actual: self.sealing_key_bytes.len(),
                }
            })?;
        let recipient = PublicKey::from(recipient_bytes);

        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&recipient);

        let (key, nonce) =
            sealed_box_key_schedule(shared.as_bytes(), ephemeral_public.as_bytes(), &recipient_bytes)?;

        let aad = unsealing_instructions.map_or(&[] as &[u8], str::as_bytes);
        let cipher = XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|_| CryptoError::SealFailure)?;
        let sealed = cipher
            .encrypt(XNonce::from_slice(&nonce), Payload { msg: plaintext, aad })
            .map_err(|_| CryptoError::SealFailure)?;

        let mut ciphertext = Vec::with_capacity(KEY_LENGTH + sealed.len());
        ciphertext.extend_from_slice(ephemeral_public.as_bytes());
        ciphertext.extend_from_slice(&sealed);

        Ok(PackagedSealedMessage {
            ciphertext,
            recipe_json: self.recipe.clone(),
            unsealing_instructions: unsealing_instructions.map(str::to_string),
        })
    }

    /// Serialize to the JSON envelope.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&SealingKeyJson {
            sealing_key_bytes: to_base64url(&self.sealing_key_bytes),
            recipe: self.recipe.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: SealingKeyJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self {
            sealing_key_bytes: from_base64url(&envelope.sealing_key_bytes)?,
            recipe: envelope.recipe,
        })
    }
}

impl UnsealingKey {
    /// Derive an unsealing key pair from a seed and recipe JSON.
    pub fn derive_from_seed(seed: &str, recipe_json: &str) -> Result<Self, CryptoError> {
        let (recipe, canonical) = parse_and_canonicalize(recipe_json)?;
        let material = derive_key_material(seed, &canonical, &recipe, KEY_LENGTH)?;
        Ok(Self { unsealing_key_bytes: material.to_vec(), recipe: canonical })
    }

    fn static_secret(&self) -> Result<StaticSecret, CryptoError> {
        let bytes: [u8; KEY_LENGTH] =
            self.unsealing_key_bytes.as_slice().try_into().map_err(|_| {
                CryptoError::InvalidKeyLength {
                    expected: KEY_LENGTH,
                    actual: self.unsealing_key_bytes.len(),
                }
            })?;
        Ok(StaticSecret::from(bytes))
    }

    /// The public sealing key for this key pair.
    pub fn sealing_key(&self) -> Result<SealingKey, CryptoError> {
        let secret = self.static_secret()?;
        Ok(SealingKey {
            sealing_key_bytes: PublicKey::from(&secret).as_bytes().to_vec(),
            recipe: self.recipe.clone(),
        })
    }

    /// Unseal a packaged message sealed to this key pair.
    pub fn unseal(&self, message: &PackagedSealedMessage) -> Result<Vec<u8>, CryptoError> {
        if message.ciphertext.len() < KEY_LENGTH {
            return Err(CryptoError::CiphertextTooShort(message.ciphertext.len()));
        }
        let (ephemeral_bytes, sealed) = message.ciphertext.split_at(KEY_LENGTH);
        let ephemeral_public: [u8; KEY_LENGTH] = ephemeral_bytes
            .try_into()
            .map_err(|_| CryptoError::CiphertextTooShort(message.ciphertext.len()))?;

        let secret = self.static_secret()?;
        let recipient_public = *PublicKey::from(&secret).as_bytes();
        let shared = secret.diffie_hellman(&PublicKey::from(ephemeral_public));

        let (key, nonce) =
            sealed_box_key_schedule(shared.as_bytes(), &ephemeral_public, &recipient_public)?;

        let cipher = XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|_| CryptoError::UnsealFailure)?;
        cipher
            .decrypt(XNonce::from_slice(&nonce), Payload { msg: sealed, aad: message.associated_data() })
            .map_err(|_| CryptoError::UnsealFailure)
    }

    /// Serialize to the JSON envelope.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(&UnsealingKeyJson {
            unsealing_key_bytes: to_base64url(&self.unsealing_key_bytes),
            recipe: self.recipe.clone(),
        })
        .map_err(|e| CryptoError::InvalidJson(e.to_string()))
    }

    /// Parse the JSON envelope produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let envelope: UnsealingKeyJson =
            serde_json::from_str(json).map_err(|e| CryptoError::InvalidJson(e.to_string()))?;
        Ok(Self {
            unsealing_key_bytes: from_base64url(&envelope.unsealing_key_bytes)?,
            recipe: envelope.recipe,
        })
    }
}
