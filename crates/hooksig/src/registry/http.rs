//! HTTP key source: the only place that interprets registry status codes.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::VerifierConfig;
use crate::error::{RejectionReason, VerifyResult};

use super::KeySource;

const USER_AGENT_VALUE: &str = concat!("hooksig/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body carried into a rejection message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Fetches the key registry with a single GET. No retries.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySource {
    pub fn new(config: &VerifierConfig) -> VerifyResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| RejectionReason::KeyFetchFailed {
                status: None,
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            url: config.keys_url.clone(),
        })
    }

    pub fn from_env() -> VerifyResult<Self> {
        Self::new(&VerifierConfig::from_env())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch_keys(&self) -> VerifyResult<HashMap<String, String>> {
        debug!(url = %self.url, "fetching public keys");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(RejectionReason::KeyFetchFailed {
                status: Some(status.as_u16()),
                message: if detail.is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    format!("HTTP {}: {}", status.as_u16(), detail)
                },
            });
        }

        let body: serde_json::Map<String, serde_json::Value> =
            response
                .json()
                .await
                .map_err(|e| RejectionReason::KeyFetchFailed {
                    status: Some(status.as_u16()),
                    message: format!("failed to parse key registry response: {}", e),
                })?;

        Ok(string_entries(body))
    }
}

/// Keep the string-valued entries of a registry response.
fn string_entries(body: serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    body.into_iter()
        .filter_map(|(key_id, value)| match value {
            serde_json::Value::String(public_key) => Some((key_id, public_key)),
            other => {
                warn!(key_id = %key_id, value = %other, "skipping non-string registry entry");
                None
            }
        })
        .collect()
}
