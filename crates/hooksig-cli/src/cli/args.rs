use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hooksig",
    version,
    about = "Verify Ed25519-signed webhook requests against the public key registry"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify a captured webhook request (signature header + raw body)
    Verify(VerifyArgs),
    /// Fetch the key registry and print each key as SPKI/DER hex
    Keys(KeysArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RegistryArgs {
    /// Public key registry URL
    #[arg(long, env = "HOOKSIG_KEYS_URL")]
    pub keys_url: Option<String>,

    /// Registry request timeout in seconds
    #[arg(long, env = "HOOKSIG_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct VerifyArgs {
    /// Signature header value, e.g. "t=1690000000,k=abc123,s=BASE64SIG"
    #[arg(long)]
    pub header: String,

    /// File holding the exact raw request body, or "-" for stdin
    #[arg(long, value_name = "FILE", default_value = "-")]
    pub body: String,

    /// Verification time in epoch seconds (defaults to now)
    #[arg(long)]
    pub now: Option<i64>,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Debug, Args, Clone)]
pub struct KeysArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
}
