//! Ed25519 webhook signature verification.
//!
//! Incoming webhooks carry a signature header of the form
//! `t=<epoch-seconds>,k=<key-id>,s=<base64-signature>`. The signature covers
//! `"{t}.{raw body}"` and was produced by one of the sender's rotating keys,
//! published at a public key registry.
//!
//! Verification runs as a short pipeline:
//!
//! - Parse the header ([`SignatureHeader`])
//! - Enforce the 10 minute replay window ([`check_freshness`])
//! - Resolve the key id through a process-lifetime cache ([`KeyResolver`])
//! - Wrap the raw key as SPKI/DER ([`KeyContainer`])
//! - Verify with the build's Ed25519 backend ([`SignatureBackend`])
//!
//! # Quick Start
//!
//! ```no_run
//! use hooksig::{VerifierConfig, WebhookVerifier};
//!
//! # async fn example(header: &str, body: &[u8]) -> Result<(), hooksig::RejectionReason> {
//! let verifier = WebhookVerifier::from_config(&VerifierConfig::from_env())?;
//!
//! let accepted = verifier.verify_now(header, body).await?;
//! println!("signed by {} {}s ago", accepted.key_id, accepted.age_secs);
//! # Ok(())
//! # }
//! ```
//!
//! # Backends
//!
//! | Feature | Backend | Environment |
//! |---------|---------|-------------|
//! | `server` | [`DalekBackend`] (`ed25519-dalek`, SPKI import) | General-purpose server |
//! | `sandbox` | [`RingBackend`] (`ring`, verify-only raw key) | Restricted worker runtime |
//!
//! [`DefaultBackend`] is the server backend when `server` is enabled.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `HOOKSIG_KEYS_URL` | Key registry URL (default: `https://api.voxeet.com/v1/public/keys/webhooks`) |
//! | `HOOKSIG_TIMEOUT` | Registry request timeout in seconds (default: 30) |

#[cfg(not(any(feature = "server", feature = "sandbox")))]
compile_error!("enable at least one backend feature: `server` or `sandbox`");

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod freshness;
pub mod header;
pub mod key;
pub mod registry;
pub mod verify;

// Re-export main types
pub use backend::{DefaultBackend, SignatureBackend};
#[cfg(feature = "server")]
pub use backend::DalekBackend;
#[cfg(feature = "sandbox")]
pub use backend::RingBackend;
pub use cache::KeyCache;
pub use config::{VerifierConfig, DEFAULT_KEYS_URL};
pub use error::{HeaderField, RejectionReason, VerifyResult};
pub use freshness::{check_freshness, parse_timestamp, unix_now, Freshness, REPLAY_WINDOW_SECS};
pub use header::{HeaderComponents, SignatureHeader};
pub use key::{KeyContainer, KEY_CONTAINER_LEN, RAW_KEY_LEN, SPKI_ED25519_PREFIX};
pub use registry::{HttpKeySource, KeyResolver, KeySource};
pub use verify::{build_payload, Accepted, WebhookVerifier, SIGNATURE_HEADER, SIGNATURE_LEN};
