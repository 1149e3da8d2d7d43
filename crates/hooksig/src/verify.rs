//! Webhook verification pipeline.
//!
//! ```text
//! header ─► parse ─► freshness ─► resolve key ─► key container ─► Ed25519 verify
//! ```
//!
//! Each stage either hands its output to the next or rejects the request with
//! a specific [`RejectionReason`]. Nothing is retried.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use crate::backend::SignatureBackend;
use crate::cache::KeyCache;
use crate::config::VerifierConfig;
use crate::error::{RejectionReason, VerifyResult};
use crate::freshness::{check_freshness, unix_now};
use crate::header::SignatureHeader;
use crate::key::KeyContainer;
use crate::registry::{HttpKeySource, KeyResolver, KeySource};

/// Name of the header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-dolby-signature";

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// A request whose signature verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Registry key that produced the signature.
    pub key_id: String,

    /// Signing time, epoch seconds.
    pub timestamp: i64,

    /// Seconds between signing and verification.
    pub age_secs: i64,
}

/// Build the signed payload: `{timestamp}.{raw_body}`.
///
/// The body is appended byte-for-byte; any re-encoding would break the
/// signature.
pub fn build_payload(timestamp: &str, raw_body: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(timestamp.len() + 1 + raw_body.len());
    payload.extend_from_slice(timestamp.as_bytes());
    payload.push(b'.');
    payload.extend_from_slice(raw_body);
    payload
}

fn decode_signature(b64: &str) -> VerifyResult<Vec<u8>> {
    let bytes = BASE64
        .decode(b64)
        .map_err(|e| RejectionReason::InvalidSignature {
            reason: format!("invalid base64 signature: {}", e),
        })?;

    if bytes.len() != SIGNATURE_LEN {
        return Err(RejectionReason::InvalidSignature {
            reason: format!(
                "expected {} signature bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            ),
        });
    }

    Ok(bytes)
}

/// Verifies signed webhook requests.
#[derive(Debug, Clone)]
pub struct WebhookVerifier<B, S> {
    backend: B,
    resolver: KeyResolver<S>,
}

#[cfg(any(feature = "server", feature = "sandbox"))]
impl WebhookVerifier<crate::backend::DefaultBackend, HttpKeySource> {
    /// Verifier using the build's default backend and the HTTP key registry.
    pub fn from_config(config: &VerifierConfig) -> VerifyResult<Self> {
        Ok(Self::new(
            crate::backend::DefaultBackend::default(),
            HttpKeySource::new(config)?,
            KeyCache::new(),
        ))
    }

    pub fn from_env() -> VerifyResult<Self> {
        Self::from_config(&VerifierConfig::from_env())
    }
}

impl<B: SignatureBackend, S: KeySource> WebhookVerifier<B, S> {
    pub fn new(backend: B, source: S, cache: KeyCache) -> Self {
        Self {
            backend,
            resolver: KeyResolver::new(source, cache),
        }
    }

    pub fn cache(&self) -> &KeyCache {
        self.resolver.cache()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Verify a request given its signature header value and raw body.
    ///
    /// `now_secs` is the current time in epoch seconds.
    pub async fn verify(
        &self,
        header_value: &str,
        raw_body: &[u8],
        now_secs: i64,
    ) -> VerifyResult<Accepted> {
        let result = self.run(header_value, raw_body, now_secs).await;

        match &result {
            Ok(accepted) => debug!(
                key_id = %accepted.key_id,
                age_secs = accepted.age_secs,
                backend = self.backend.name(),
                "webhook signature accepted"
            ),
            Err(reason) => warn!(
                kind = reason.kind(),
                error = %reason,
                backend = self.backend.name(),
                "webhook signature rejected"
            ),
        }

        result
    }

    /// [`verify`](Self::verify) against the current wall-clock time.
    pub async fn verify_now(&self, header_value: &str, raw_body: &[u8]) -> VerifyResult<Accepted> {
        self.verify(header_value, raw_body, unix_now()).await
    }

    /// Verify a request by its headers, reading [`SIGNATURE_HEADER`].
    pub async fn verify_headers(
        &self,
        headers: &HeaderMap,
        raw_body: &[u8],
        now_secs: i64,
    ) -> VerifyResult<Accepted> {
        let header_value = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| RejectionReason::MissingHeader {
                name: SIGNATURE_HEADER.to_string(),
            })?;

        self.verify(header_value, raw_body, now_secs).await
    }

    async fn run(&self, header_value: &str, raw_body: &[u8], now_secs: i64) -> VerifyResult<Accepted> {
        let header = SignatureHeader::parse(header_value)?;
        let freshness = check_freshness(&header.timestamp, now_secs)?;

        let public_key = self.resolver.resolve(&header.key_id).await?;
        let container = KeyContainer::from_base64(&public_key)?;
        let key = self.backend.import_verify_only_key(&container)?;

        let signature = decode_signature(&header.signature)?;
        let payload = build_payload(&header.timestamp, raw_body);

        if !self.backend.verify(&key, &signature, &payload).await {
            return Err(RejectionReason::InvalidSignature {
                reason: "ed25519 verification failed".to_string(),
            });
        }

        Ok(Accepted {
            key_id: header.key_id,
            timestamp: freshness.signed_at,
            age_secs: freshness.age_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{sign, signing_key};
    use crate::error::HeaderField;
    use async_trait::async_trait;
    use ed25519_dalek::SigningKey;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TS: &str = "1700000000";
    const BODY: &[u8] = br#"{"event":"call.started"}"#;

    #[derive(Debug, Clone, Default)]
    struct MapSource {
        keys: HashMap<String, String>,
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl KeySource for MapSource {
        async fn fetch_keys(&self) -> VerifyResult<HashMap<String, String>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.keys.clone())
        }
    }

    fn public_key_b64(key: &SigningKey) -> String {
        BASE64.encode(key.verifying_key().as_bytes())
    }

    fn source_for(key_id: &str, key: &SigningKey) -> MapSource {
        MapSource {
            keys: [(key_id.to_string(), public_key_b64(key))].into_iter().collect(),
            ..MapSource::default()
        }
    }

    fn signed_header(key: &SigningKey, key_id: &str, timestamp: &str, body: &[u8]) -> String {
        let signature = sign(key, &build_payload(timestamp, body));
        format!("t={},k={},s={}", timestamp, key_id, BASE64.encode(signature))
    }

    fn verifier<B: SignatureBackend>(backend: B, source: MapSource) -> WebhookVerifier<B, MapSource> {
        WebhookVerifier::new(backend, source, KeyCache::new())
    }

    #[test]
    fn test_build_payload() {
        assert_eq!(build_payload("123", b"{}"), b"123.{}".to_vec());
        assert_eq!(build_payload("123", b""), b"123.".to_vec());
    }

    #[test]
    fn test_build_payload_keeps_body_bytes() {
        // Non-UTF-8 and whitespace survive untouched
        let body = [0xff, b' ', b'\n', 0x00];
        let payload = build_payload("1", &body);
        assert_eq!(&payload[2..], &body);
    }

    #[test]
    fn test_decode_signature_rejects_bad_input() {
        assert!(matches!(
            decode_signature("@@@"),
            Err(RejectionReason::InvalidSignature { .. })
        ));
        assert!(matches!(
            decode_signature(&BASE64.encode([0u8; 63])),
            Err(RejectionReason::InvalidSignature { .. })
        ));
        assert_eq!(decode_signature(&BASE64.encode([7u8; 64])).unwrap().len(), 64);
    }

    #[cfg(feature = "server")]
    mod server {
        use super::*;
        use crate::backend::DalekBackend;

        #[tokio::test]
        async fn test_accepts_valid_signature() {
            let key = signing_key(9);
            let verifier = verifier(DalekBackend, source_for("test-key", &key));
            let header = signed_header(&key, "test-key", TS, BODY);

            let accepted = verifier.verify(&header, BODY, 1_700_000_300).await.unwrap();
            assert_eq!(
                accepted,
                Accepted {
                    key_id: "test-key".to_string(),
                    timestamp: 1_700_000_000,
                    age_secs: 300,
                }
            );
        }

        #[tokio::test]
        async fn test_expired_before_key_fetch() {
            let key = signing_key(9);
            let source = source_for("test-key", &key);
            let fetches = source.fetches.clone();
            let verifier = verifier(DalekBackend, source);
            let header = signed_header(&key, "test-key", TS, BODY);

            let result = verifier.verify(&header, BODY, 1_700_000_700).await;
            assert!(matches!(result, Err(RejectionReason::Expired { age_secs: 700, .. })));
            assert_eq!(fetches.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn test_missing_field_short_circuits() {
            let key = signing_key(9);
            let source = source_for("test-key", &key);
            let fetches = source.fetches.clone();
            let verifier = verifier(DalekBackend, source);

            let result = verifier.verify("t=1700000000,s=AAAA", BODY, 1_700_000_000).await;
            assert_eq!(result, Err(RejectionReason::MissingField(HeaderField::KeyId)));
            assert_eq!(fetches.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn test_wrong_key_rejected() {
            let signer = signing_key(9);
            let registered = signing_key(10);
            let verifier = verifier(DalekBackend, source_for("test-key", &registered));
            let header = signed_header(&signer, "test-key", TS, BODY);

            let result = verifier.verify(&header, BODY, 1_700_000_000).await;
            assert!(matches!(result, Err(RejectionReason::InvalidSignature { .. })));
        }

        #[tokio::test]
        async fn test_malformed_registry_key() {
            let key = signing_key(9);
            let source = MapSource {
                keys: [("test-key".to_string(), "%%%".to_string())].into_iter().collect(),
                ..MapSource::default()
            };
            let verifier = verifier(DalekBackend, source);
            let header = signed_header(&key, "test-key", TS, BODY);

            let result = verifier.verify(&header, BODY, 1_700_000_000).await;
            assert!(matches!(result, Err(RejectionReason::InvalidKeyEncoding { .. })));
        }

        #[tokio::test]
        async fn test_verify_headers() {
            let key = signing_key(9);
            let verifier = verifier(DalekBackend, source_for("test-key", &key));

            let mut headers = HeaderMap::new();
            headers.insert(
                SIGNATURE_HEADER,
                signed_header(&key, "test-key", TS, BODY).parse().unwrap(),
            );
            assert!(verifier
                .verify_headers(&headers, BODY, 1_700_000_000)
                .await
                .is_ok());

            let result = verifier
                .verify_headers(&HeaderMap::new(), BODY, 1_700_000_000)
                .await;
            assert_eq!(
                result,
                Err(RejectionReason::MissingHeader {
                    name: SIGNATURE_HEADER.to_string()
                })
            );
        }
    }

    #[cfg(feature = "sandbox")]
    mod sandbox {
        use super::*;
        use crate::backend::RingBackend;

        #[tokio::test]
        async fn test_accepts_valid_signature() {
            let key = signing_key(9);
            let verifier = verifier(RingBackend, source_for("test-key", &key));
            let header = signed_header(&key, "test-key", TS, BODY);

            let accepted = verifier.verify(&header, BODY, 1_700_000_300).await.unwrap();
            assert_eq!(accepted.key_id, "test-key");
            assert_eq!(accepted.age_secs, 300);
        }

        #[tokio::test]
        async fn test_tampered_body_rejected() {
            let key = signing_key(9);
            let verifier = verifier(RingBackend, source_for("test-key", &key));
            let header = signed_header(&key, "test-key", TS, BODY);

            let result = verifier
                .verify(&header, br#"{"event":"call.ended"}"#, 1_700_000_300)
                .await;
            assert_eq!(
                result,
                Err(RejectionReason::InvalidSignature {
                    reason: "ed25519 verification failed".to_string()
                })
            );
        }
    }
}
