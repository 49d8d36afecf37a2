use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::json;
use verichain_client::{short, Dashboard};

use super::output::print_json;
use super::{build_client, fail, settle};
use crate::cli::args::{GlobalArgs, OutputFormat, RevokeArgs};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(args: RevokeArgs, global: &GlobalArgs) -> anyhow::Result<i32> {
    let client = match build_client(global) {
        Ok(client) => client,
        Err(e) => return Ok(fail(&e)),
    };
    let hash = args.hash.trim();

    // Revoking works on the wallet's listed documents.
    let dashboard = Dashboard::new(client).with_wallet(&args.wallet.wallet);
    if let Err(e) = settle(dashboard.fetch().await, "fetch")? {
        eprintln!("{}", dashboard.message());
        return Ok(fail(&e));
    }

    let listed = dashboard.records().into_iter().find(|r| r.hash == hash);
    if let (Some(record), false) = (listed, args.yes) {
        let prompt = format!(
            "Revoke \"{}\" ({})? This cannot be undone.",
            record.name,
            short(hash, 16)
        );
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            eprintln!("Revoke cancelled.");
            return Ok(EXIT_SUCCESS);
        }
    }

    let result = settle(dashboard.revoke(hash).await, "revoke")?;
    let message = dashboard.message();
    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => {
            eprintln!("{message}");
            return Ok(fail(&e));
        }
    };

    match global.format {
        OutputFormat::Text => {
            println!("{message}");
            if let Some(tx) = &receipt.tx_hash {
                println!("tx {tx}");
            }
        }
        OutputFormat::Json => print_json(&json!({
            "hash": hash,
            "message": message,
            "tx_hash": receipt.tx_hash,
        }))?,
    }
    Ok(EXIT_SUCCESS)
}
