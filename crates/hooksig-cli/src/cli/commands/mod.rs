use hooksig::VerifierConfig;

use super::args::*;

pub mod keys;
pub mod verify;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Verify(args) => verify::run(args).await,
        Command::Keys(args) => keys::run(args).await,
    }
}

/// Environment config, overridden by explicit flags.
pub(crate) fn verifier_config(args: &RegistryArgs) -> VerifierConfig {
    let mut config = VerifierConfig::from_env();
    if let Some(url) = &args.keys_url {
        config = config.with_keys_url(url.clone());
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout_secs(timeout);
    }
    config
}
