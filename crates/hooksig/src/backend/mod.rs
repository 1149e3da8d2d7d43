//! Ed25519 verification backends.
//!
//! The same verification runs on two environments with different primitive
//! APIs. Which backend is used is decided at build time through the `server`
//! and `sandbox` features; business logic only sees [`SignatureBackend`].

use async_trait::async_trait;

use crate::error::VerifyResult;
use crate::key::KeyContainer;

#[cfg(feature = "sandbox")]
mod sandbox;
#[cfg(feature = "server")]
mod server;

#[cfg(feature = "sandbox")]
pub use sandbox::RingBackend;
#[cfg(feature = "server")]
pub use server::DalekBackend;

/// Backend used when none is chosen explicitly: the server backend when the
/// `server` feature is on, the sandbox backend otherwise.
#[cfg(feature = "server")]
pub type DefaultBackend = DalekBackend;

#[cfg(all(feature = "sandbox", not(feature = "server")))]
pub type DefaultBackend = RingBackend;

/// Verify-only Ed25519 primitive.
#[async_trait]
pub trait SignatureBackend: Send + Sync {
    /// Imported public key, usable only for verification.
    type KeyHandle: Send + Sync;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Import an SPKI/DER key container.
    ///
    /// Fails with `InvalidKeyEncoding` when the primitive rejects the key.
    fn import_verify_only_key(&self, container: &KeyContainer) -> VerifyResult<Self::KeyHandle>;

    /// Check `signature` over `payload`. A mismatch is `false`, not an error.
    async fn verify(&self, key: &Self::KeyHandle, signature: &[u8], payload: &[u8]) -> bool;
}

#[cfg(test)]
pub(crate) mod test_support {
    use ed25519_dalek::{Signer, SigningKey};

    use crate::key::KeyContainer;

    pub(crate) fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    pub(crate) fn container(key: &SigningKey) -> KeyContainer {
        KeyContainer::from_raw(key.verifying_key().as_bytes())
    }

    pub(crate) fn sign(key: &SigningKey, payload: &[u8]) -> Vec<u8> {
        key.sign(payload).to_bytes().to_vec()
    }
}
