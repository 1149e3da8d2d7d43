//! Signature header parsing.
//!
//! The header is a comma-joined list of `key=value` components:
//!
//! ```text
//! t=1690000000,k=abc123,s=BASE64SIG
//! ```
//!
//! Components may appear in any order and unknown keys are ignored, since the
//! sender may add or reorder components over time. When a key repeats, the
//! last occurrence wins.

use crate::error::{HeaderField, RejectionReason, VerifyResult};

/// Header components as found, before required fields are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderComponents {
    pub timestamp: Option<String>,
    pub key_id: Option<String>,
    pub signature: Option<String>,
}

impl HeaderComponents {
    /// Collect `t`, `k` and `s` components from a header value.
    ///
    /// Never fails: segments without `=` and unknown keys are skipped.
    pub fn parse(header: &str) -> Self {
        let mut components = Self::default();

        for segment in header.split(',') {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };

            let slot = match key {
                "t" => &mut components.timestamp,
                "k" => &mut components.key_id,
                "s" => &mut components.signature,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }

        components
    }

    /// Require all three fields, reporting the first one that is absent.
    ///
    /// An empty value (`t=`) counts as absent.
    pub fn require(self) -> VerifyResult<SignatureHeader> {
        Ok(SignatureHeader {
            timestamp: required(self.timestamp, HeaderField::Timestamp)?,
            key_id: required(self.key_id, HeaderField::KeyId)?,
            signature: required(self.signature, HeaderField::Signature)?,
        })
    }
}

fn required(value: Option<String>, field: HeaderField) -> VerifyResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RejectionReason::MissingField(field))
}

/// A complete signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Signing time, still in its textual form: the signed payload embeds it
    /// verbatim.
    pub timestamp: String,

    /// Identifier of the registry key that produced the signature.
    pub key_id: String,

    /// Base64-encoded Ed25519 signature.
    pub signature: String,
}

impl SignatureHeader {
    /// Parse a header value and require the timestamp, key id and signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooksig::{HeaderField, RejectionReason, SignatureHeader};
    ///
    /// let header = SignatureHeader::parse("k=abc123,s=c2ln,t=1690000000").unwrap();
    /// assert_eq!(header.timestamp, "1690000000");
    /// assert_eq!(header.key_id, "abc123");
    ///
    /// let missing = SignatureHeader::parse("t=1690000000,s=c2ln");
    /// assert_eq!(missing, Err(RejectionReason::MissingField(HeaderField::KeyId)));
    /// ```
    pub fn parse(header: &str) -> VerifyResult<Self> {
        HeaderComponents::parse(header).require()
    }
}
