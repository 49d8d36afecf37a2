use tracing::warn;
use verichain_client::{digest_bytes, ClientError};

use super::output::print_json;
use super::{build_client, fail};
use crate::cli::args::{GlobalArgs, OutputFormat, UploadArgs};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(args: UploadArgs, global: &GlobalArgs) -> anyhow::Result<i32> {
    let client = match build_client(global) {
        Ok(client) => client,
        Err(e) => return Ok(fail(&e)),
    };
    let bytes = match tokio::fs::read(&args.file).await {
        Ok(bytes) => bytes,
        Err(e) => return Ok(fail(&ClientError::from(e))),
    };
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let local = digest_bytes(&bytes);

    let receipt = match client
        .upload(&args.wallet.wallet, &file_name, bytes, args.cid.as_deref())
        .await
    {
        Ok(receipt) => receipt,
        Err(e) => return Ok(fail(&e)),
    };

    if let Some(remote) = receipt.hash.as_deref() {
        if !remote.eq_ignore_ascii_case(local.as_str()) {
            warn!(local = %local, remote, "backend hash differs from local digest");
        }
    }

    match global.format {
        OutputFormat::Text => {
            println!(
                "{}",
                receipt.message.as_deref().unwrap_or("Uploaded successfully!")
            );
            println!("hash {}", receipt.hash.as_deref().unwrap_or(local.as_str()));
            if let Some(cid) = &receipt.cid {
                println!("cid  {cid}");
            }
            if let Some(tx) = &receipt.tx_hash {
                println!("tx   {tx}");
            }
        }
        OutputFormat::Json => print_json(&receipt)?,
    }
    Ok(EXIT_SUCCESS)
}
