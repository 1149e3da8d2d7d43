use anyhow::{Context, Result};
use hooksig::{HttpKeySource, KeyContainer, KeySource};

use super::verifier_config;
use crate::cli::args::KeysArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: KeysArgs) -> Result<i32> {
    let config = verifier_config(&args.registry);
    let source = HttpKeySource::new(&config).context("failed to set up key registry client")?;

    let keys = source
        .fetch_keys()
        .await
        .with_context(|| format!("failed to fetch keys from {}", source.url()))?;

    let mut key_ids: Vec<&String> = keys.keys().collect();
    key_ids.sort();

    for key_id in key_ids {
        match KeyContainer::from_base64(&keys[key_id]) {
            Ok(container) => println!("{}\t{}", key_id, hex::encode(container.as_bytes())),
            Err(e) => println!("{}\tinvalid: {}", key_id, e),
        }
    }

    Ok(SUCCESS)
}
