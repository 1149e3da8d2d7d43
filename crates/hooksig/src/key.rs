//! Ed25519 public key containers.
//!
//! The registry publishes raw 32-byte keys. Primitives that import keys in
//! SubjectPublicKeyInfo form get them wrapped with the fixed DER header for the
//! Ed25519 algorithm identifier (OID 1.3.101.112).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{RejectionReason, VerifyResult};

/// DER header of an Ed25519 SubjectPublicKeyInfo:
/// `SEQUENCE { SEQUENCE { OID 1.3.101.112 }, BIT STRING (33 bytes) }`.
pub const SPKI_ED25519_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// Length of a raw Ed25519 public key.
pub const RAW_KEY_LEN: usize = 32;

/// Length of a complete key container.
pub const KEY_CONTAINER_LEN: usize = SPKI_ED25519_PREFIX.len() + RAW_KEY_LEN;

/// SPKI/DER-encoded Ed25519 public key. Always [`KEY_CONTAINER_LEN`] bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyContainer([u8; KEY_CONTAINER_LEN]);

impl KeyContainer {
    /// Wrap raw public key bytes.
    pub fn from_raw(raw: &[u8; RAW_KEY_LEN]) -> Self {
        let mut bytes = [0u8; KEY_CONTAINER_LEN];
        bytes[..SPKI_ED25519_PREFIX.len()].copy_from_slice(&SPKI_ED25519_PREFIX);
        bytes[SPKI_ED25519_PREFIX.len()..].copy_from_slice(raw);
        Self(bytes)
    }

    /// Decode a base64 raw public key as published by the key registry.
    pub fn from_base64(b64: &str) -> VerifyResult<Self> {
        let decoded = BASE64
            .decode(b64)
            .map_err(|e| RejectionReason::InvalidKeyEncoding {
                reason: format!("invalid base64 public key: {}", e),
            })?;

        let raw: [u8; RAW_KEY_LEN] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| RejectionReason::InvalidKeyEncoding {
                    reason: format!(
                        "expected {} key bytes, got {}",
                        RAW_KEY_LEN,
                        decoded.len()
                    ),
                })?;

        Ok(Self::from_raw(&raw))
    }

    /// The full DER encoding.
    pub fn as_bytes(&self) -> &[u8; KEY_CONTAINER_LEN] {
        &self.0
    }

    /// The raw 32-byte public key.
    pub fn raw_key(&self) -> &[u8] {
        &self.0[SPKI_ED25519_PREFIX.len()..]
    }
}

impl AsRef<[u8]> for KeyContainer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for KeyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("KeyContainer")
            .field(&BASE64.encode(self.raw_key()))
            .finish()
    }
}
