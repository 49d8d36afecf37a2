use verichain_client::Dashboard;

use super::output::{print_json, print_records};
use super::{build_client, fail, settle};
use crate::cli::args::{GlobalArgs, RetrieveArgs};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(args: RetrieveArgs, global: &GlobalArgs) -> anyhow::Result<i32> {
    let client = match build_client(global) {
        Ok(client) => client,
        Err(e) => return Ok(fail(&e)),
    };

    if args.raw {
        return match client.retrieve_raw(&args.wallet.wallet).await {
            Ok(payload) => {
                print_json(&payload)?;
                Ok(EXIT_SUCCESS)
            }
            Err(e) => Ok(fail(&e)),
        };
    }

    let dashboard = Dashboard::new(client).with_wallet(&args.wallet.wallet);
    let result = settle(dashboard.fetch().await, "fetch")?;
    eprintln!("{}", dashboard.message());
    if let Err(e) = result {
        return Ok(fail(&e));
    }

    print_records(&dashboard.records(), global.format)?;
    Ok(EXIT_SUCCESS)
}
