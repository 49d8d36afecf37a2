use super::args::*;

pub mod hash;
pub(crate) mod output;
pub mod retrieve;
pub mod revoke;
pub mod store;
pub mod upload;
pub mod verify;

use crate::exit_codes::EXIT_SUCCESS;
use verichain_client::{ClientConfig, ClientError, DocClient, Outcome};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let global = cli.global;
    match cli.cmd {
        Command::Hash(args) => hash::run(args, &global).await,
        Command::Store(args) => store::run(args, &global).await,
        Command::Upload(args) => upload::run(args, &global).await,
        Command::Retrieve(args) => retrieve::run(args, &global).await,
        Command::Revoke(args) => revoke::run(args, &global).await,
        Command::Verify(args) => verify::run(args, &global).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Client for the configured backend.
pub(crate) fn build_client(global: &GlobalArgs) -> Result<DocClient, ClientError> {
    DocClient::new(
        ClientConfig::default()
            .with_url(global.api_url.as_str())
            .with_timeout_secs(global.timeout),
    )
}

/// Report a client failure on stderr and return its exit code.
pub(crate) fn fail(err: &ClientError) -> i32 {
    eprintln!("error: {err}");
    err.exit_code()
}

/// A one-shot command never overlaps itself, so `Ignored` means a bug.
pub(crate) fn settle<T>(outcome: Outcome<T>, action: &str) -> anyhow::Result<T> {
    outcome
        .completed()
        .ok_or_else(|| anyhow::anyhow!("{action} was already in progress"))
}
