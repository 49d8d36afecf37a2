use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use verichain_client::DEFAULT_API_URL;

#[derive(Parser)]
#[command(
    name = "verichain",
    version,
    about = "Anchor document hashes on VeriChain, list and revoke them, and verify files"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the SHA-256 of a file
    Hash(HashArgs),
    /// Anchor a document hash for a wallet
    Store(StoreArgs),
    /// Send a file to the backend, which hashes and anchors it
    Upload(UploadArgs),
    /// List the documents anchored by a wallet
    Retrieve(RetrieveArgs),
    /// Revoke one of a wallet's documents
    Revoke(RevokeArgs),
    /// Check whether a hash is anchored and not revoked
    Verify(VerifyArgs),
    Version,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Backend base URL
    #[arg(long, global = true, env = "VERICHAIN_API_BASE_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "VERICHAIN_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Clone, Debug)]
pub struct WalletArg {
    /// Wallet address the documents belong to
    #[arg(long, env = "VERICHAIN_WALLET")]
    pub wallet: String,
}

#[derive(Args, Clone, Debug)]
pub struct HashArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    #[command(flatten)]
    pub wallet: WalletArg,

    /// Hash this file locally and store its digest
    #[arg(long, value_name = "FILE", conflicts_with = "hash", required_unless_present = "hash")]
    pub file: Option<PathBuf>,

    /// Store an already computed SHA-256 hex digest
    #[arg(long, requires = "name")]
    pub hash: Option<String>,

    /// Document name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// IPFS content identifier to attach
    #[arg(long)]
    pub cid: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct UploadArgs {
    #[command(flatten)]
    pub wallet: WalletArg,

    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// IPFS content identifier to attach
    #[arg(long)]
    pub cid: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct RetrieveArgs {
    #[command(flatten)]
    pub wallet: WalletArg,

    /// Print the backend payload as received, without normalization
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Clone, Debug)]
pub struct RevokeArgs {
    #[command(flatten)]
    pub wallet: WalletArg,

    /// Hash of the document to revoke
    #[arg(long)]
    pub hash: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Clone, Debug)]
pub struct VerifyArgs {
    /// SHA-256 hex digest to check
    #[arg(value_name = "HASH")]
    pub hash: String,

    /// Answer after a fixed delay instead of asking the backend
    #[arg(long, conflicts_with = "offline")]
    pub simulate: bool,

    /// Only check the hash format
    #[arg(long)]
    pub offline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_store_requires_file_or_hash() {
        let err = Cli::try_parse_from(["verichain", "store", "--wallet", "0xabc"]);
        assert!(err.is_err());

        let err = Cli::try_parse_from(["verichain", "store", "--wallet", "0xabc", "--hash", "aa"]);
        assert!(err.is_err(), "--hash needs --name");

        let cli = Cli::try_parse_from([
            "verichain", "store", "--wallet", "0xabc", "--hash", "aa", "--name", "a.pdf",
        ])
        .unwrap();
        assert!(matches!(cli.cmd, Command::Store(_)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "verichain",
            "verify",
            "deadbeef",
            "--offline",
            "--format",
            "json",
            "--api-url",
            "http://backend:5000",
        ])
        .unwrap();

        assert_eq!(cli.global.format, OutputFormat::Json);
        assert_eq!(cli.global.api_url, "http://backend:5000");
        let Command::Verify(args) = cli.cmd else {
            panic!("expected verify");
        };
        assert!(args.offline);
        assert!(!args.simulate);
    }

    #[test]
    fn test_simulate_conflicts_with_offline() {
        let err = Cli::try_parse_from(["verichain", "verify", "aa", "--simulate", "--offline"]);
        assert!(err.is_err());
    }
}
