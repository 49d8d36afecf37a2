use serde_json::json;
use verichain_client::{ContentHash, UploadFlow};

use super::output::print_json;
use super::{build_client, fail, settle};
use crate::cli::args::{GlobalArgs, OutputFormat, StoreArgs};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(args: StoreArgs, global: &GlobalArgs) -> anyhow::Result<i32> {
    let client = match build_client(global) {
        Ok(client) => client,
        Err(e) => return Ok(fail(&e)),
    };
    let flow = UploadFlow::new(client).with_wallet(&args.wallet.wallet);
    flow.set_cid(args.cid.as_deref());

    if let Some(file) = &args.file {
        flow.select(file);
        if let Err(e) = settle(flow.compute().await, "hashing")? {
            eprintln!("{}", flow.message());
            return Ok(fail(&e));
        }
    } else if let Some(hash) = &args.hash {
        match ContentHash::parse(hash) {
            Ok(hash) => flow.set_hash(hash),
            Err(e) => return Ok(fail(&e)),
        }
    }

    let receipt = match settle(flow.store(args.name.as_deref()).await, "store")? {
        Ok(receipt) => receipt,
        Err(e) => {
            eprintln!("{}", flow.message());
            return Ok(fail(&e));
        }
    };
    let hash = flow.hash().map(|h| h.to_string()).unwrap_or_default();

    match global.format {
        OutputFormat::Text => {
            println!("{}", flow.message());
            println!("hash {hash}");
            if let Some(tx) = &receipt.tx_hash {
                println!("tx   {tx}");
            }
        }
        OutputFormat::Json => print_json(&json!({
            "hash": hash,
            "message": flow.message(),
            "tx_hash": receipt.tx_hash,
        }))?,
    }
    Ok(EXIT_SUCCESS)
}
