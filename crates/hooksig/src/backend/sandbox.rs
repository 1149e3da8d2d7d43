//! Sandbox backend: `ring`'s verify-only `UnparsedPublicKey`.
//!
//! `ring` takes raw key bytes rather than SPKI, so import unwraps the DER
//! header itself. The key is only validated when a signature is checked.

use async_trait::async_trait;
use ring::signature::{UnparsedPublicKey, ED25519};

use crate::error::{RejectionReason, VerifyResult};
use crate::key::{KeyContainer, SPKI_ED25519_PREFIX};

use super::SignatureBackend;

/// Ed25519 verification through `ring`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingBackend;

#[async_trait]
impl SignatureBackend for RingBackend {
    type KeyHandle = UnparsedPublicKey<Vec<u8>>;

    fn name(&self) -> &'static str {
        "ring"
    }

    fn import_verify_only_key(
        &self,
        container: &KeyContainer,
    ) -> VerifyResult<UnparsedPublicKey<Vec<u8>>> {
        let der = container.as_bytes();
        if der[..SPKI_ED25519_PREFIX.len()] != SPKI_ED25519_PREFIX {
            return Err(RejectionReason::InvalidKeyEncoding {
                reason: "not an Ed25519 SPKI key".to_string(),
            });
        }

        let raw = der[SPKI_ED25519_PREFIX.len()..].to_vec();
        Ok(UnparsedPublicKey::new(&ED25519, raw))
    }

    async fn verify(
        &self,
        key: &UnparsedPublicKey<Vec<u8>>,
        signature: &[u8],
        payload: &[u8],
    ) -> bool {
        key.verify(payload, signature).is_ok()
    }
}
