//! Server backend: ed25519-dalek with SPKI/DER key import.

use async_trait::async_trait;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use pkcs8::DecodePublicKey;

use crate::error::{RejectionReason, VerifyResult};
use crate::key::KeyContainer;

use super::SignatureBackend;

/// Ed25519 verification through `ed25519-dalek`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DalekBackend;

#[async_trait]
impl SignatureBackend for DalekBackend {
    type KeyHandle = VerifyingKey;

    fn name(&self) -> &'static str {
        "ed25519-dalek"
    }

    fn import_verify_only_key(&self, container: &KeyContainer) -> VerifyResult<VerifyingKey> {
        VerifyingKey::from_public_key_der(container.as_bytes()).map_err(|e| {
            RejectionReason::InvalidKeyEncoding {
                reason: format!("invalid SPKI public key: {}", e),
            }
        })
    }

    async fn verify(&self, key: &VerifyingKey, signature: &[u8], payload: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify(payload, &signature).is_ok()
    }
}
