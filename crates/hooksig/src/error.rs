//! Rejection reasons for webhook verification.

use std::fmt;

/// A field of the signature header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// `t=`: signing time in epoch seconds.
    Timestamp,
    /// `k=`: identifier of the signing key.
    KeyId,
    /// `s=`: base64 Ed25519 signature.
    Signature,
}

impl HeaderField {
    /// Key used for this field in the header (`t`, `k` or `s`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Timestamp => "t",
            Self::KeyId => "k",
            Self::Signature => "s",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timestamp => "timestamp",
            Self::KeyId => "key id",
            Self::Signature => "signature",
        };
        write!(f, "{} ({}=)", name, self.key())
    }
}

/// Why a webhook request was rejected.
///
/// Every stage of the pipeline fails with exactly one of these; none of them
/// are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    /// The request carried no usable signature header.
    #[error("missing signature header: {name}")]
    MissingHeader { name: String },

    /// The signature header lacks a required field.
    #[error("signature header is missing {0}")]
    MissingField(HeaderField),

    /// The timestamp is not a decimal count of epoch seconds.
    #[error("invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    /// The signature is older than the replay window.
    #[error("signature expired: {age_secs}s old, window is {window_secs}s")]
    Expired { age_secs: i64, window_secs: i64 },

    /// The key registry could not be fetched or its body could not be read.
    #[error("failed to fetch public keys: {message}")]
    KeyFetchFailed {
        status: Option<u16>,
        message: String,
    },

    /// The key registry does not list the requested key.
    #[error("public key not found: {key_id}")]
    KeyNotFound { key_id: String },

    /// The public key is not valid base64 or not a 32-byte Ed25519 key.
    #[error("invalid public key encoding: {reason}")]
    InvalidKeyEncoding { reason: String },

    /// The signature is malformed or does not match the payload.
    #[error("signature verification failed: {reason}")]
    InvalidSignature { reason: String },
}

impl RejectionReason {
    /// Stable snake_case label, suitable for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingHeader { .. } => "missing_header",
            Self::MissingField(_) => "missing_field",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::Expired { .. } => "expired",
            Self::KeyFetchFailed { .. } => "key_fetch_failed",
            Self::KeyNotFound { .. } => "key_not_found",
            Self::InvalidKeyEncoding { .. } => "invalid_key_encoding",
            Self::InvalidSignature { .. } => "invalid_signature",
        }
    }

    /// Suggested HTTP status for the response to the webhook sender.
    pub fn status_code(&self) -> u16 {
        match self {
            // Malformed request
            Self::MissingHeader { .. } => 400,
            Self::MissingField(_) => 400,
            Self::InvalidTimestamp { .. } => 400,

            // Authentication failures
            Self::Expired { .. } => 401,
            Self::KeyNotFound { .. } => 401,
            Self::InvalidSignature { .. } => 401,

            // Upstream registry problems
            Self::KeyFetchFailed { .. } => 502,
            Self::InvalidKeyEncoding { .. } => 502,
        }
    }
}

impl From<reqwest::Error> for RejectionReason {
    fn from(err: reqwest::Error) -> Self {
        Self::KeyFetchFailed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Result type for verification operations.
pub type VerifyResult<T> = Result<T, RejectionReason>;
