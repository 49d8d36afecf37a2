use std::time::Duration;

use serde_json::json;
use verichain_client::{HashLookup, SimulatedLookup, VerifyFlow, VerifyState, SIMULATED_LATENCY};

use super::output::print_json;
use super::{build_client, fail, settle};
use crate::cli::args::{GlobalArgs, OutputFormat, VerifyArgs};
use crate::exit_codes::{EXIT_SUCCESS, NOT_AUTHENTIC};

pub async fn run(args: VerifyArgs, global: &GlobalArgs) -> anyhow::Result<i32> {
    let budget = Duration::from_secs(global.timeout);
    if args.offline {
        let flow = VerifyFlow::new(SimulatedLookup::new(Duration::ZERO), budget);
        return check(&flow, &args.hash, global.format).await;
    }
    if args.simulate {
        let flow = VerifyFlow::new(SimulatedLookup::new(SIMULATED_LATENCY), budget);
        return check(&flow, &args.hash, global.format).await;
    }

    let client = match build_client(global) {
        Ok(client) => client,
        Err(e) => return Ok(fail(&e)),
    };
    let flow = VerifyFlow::new(client, budget);
    check(&flow, &args.hash, global.format).await
}

async fn check<L: HashLookup>(
    flow: &VerifyFlow<L>,
    input: &str,
    format: OutputFormat,
) -> anyhow::Result<i32> {
    let state = settle(flow.check(input).await, "verification")?;
    let failure = flow.failure();

    match format {
        OutputFormat::Text => {
            println!("{}", state.label());
            println!("{}", flow.result_line());
        }
        OutputFormat::Json => print_json(&json!({
            "hash": input.trim(),
            "status": state.label(),
            "authentic": state == VerifyState::Valid,
            "error": failure.as_ref().map(|_| flow.message()),
        }))?,
    }

    if let Some(e) = failure {
        eprintln!("{}", flow.message());
        return Ok(fail(&e));
    }
    Ok(if state == VerifyState::Valid {
        EXIT_SUCCESS
    } else {
        NOT_AUTHENTIC
    })
}
