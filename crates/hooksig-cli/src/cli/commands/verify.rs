use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use hooksig::{unix_now, WebhookVerifier};

use super::verifier_config;
use crate::cli::args::VerifyArgs;
use crate::exit_codes::{REJECTED, SUCCESS};

pub async fn run(args: VerifyArgs) -> Result<i32> {
    let body = read_body(&args.body)?;
    let config = verifier_config(&args.registry);
    let verifier =
        WebhookVerifier::from_config(&config).context("failed to set up key registry client")?;

    let now = args.now.unwrap_or_else(unix_now);
    tracing::debug!(now, keys_url = %config.keys_url, body_len = body.len(), "verifying");

    match verifier.verify(&args.header, &body, now).await {
        Ok(accepted) => {
            println!(
                "accepted key_id={} timestamp={} age={}s",
                accepted.key_id, accepted.timestamp, accepted.age_secs
            );
            Ok(SUCCESS)
        }
        Err(reason) => {
            println!("rejected ({}): {}", reason.kind(), reason);
            Ok(REJECTED)
        }
    }
}

/// Body bytes exactly as received; no newline or encoding normalization.
fn read_body(source: &str) -> Result<Vec<u8>> {
    if source == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read body from stdin")?;
        return Ok(buf);
    }

    fs::read(source).with_context(|| format!("failed to read body from {}", source))
}
