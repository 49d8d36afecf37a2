use serde_json::json;
use verichain_client::digest_file_async;

use super::output::print_json;
use super::fail;
use crate::cli::args::{GlobalArgs, HashArgs, OutputFormat};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(args: HashArgs, global: &GlobalArgs) -> anyhow::Result<i32> {
    let hash = match digest_file_async(&args.file).await {
        Ok(hash) => hash,
        Err(e) => return Ok(fail(&e)),
    };

    match global.format {
        OutputFormat::Text => println!("{hash}  {}", args.file.display()),
        OutputFormat::Json => print_json(&json!({
            "file": args.file.display().to_string(),
            "hash": hash.as_str(),
        }))?,
    }
    Ok(EXIT_SUCCESS)
}
