//! One-shot action batch submitter.
//!
//! Reads the signing credential from the environment, loads the prepared
//! action batch from `actions.json` next to the program, signs the batch as
//! one transaction, submits it to the ledger node, and prints the resulting
//! transaction identifier. Exactly one attempt is made; any failure ends the
//! invocation with a non-zero exit status.

use std::process::ExitCode;
use std::sync::Arc;

use courier_tx::config::Config;
use courier_tx::pipeline;
use courier_tx::report::FailureReport;
use courier_tx::submit::{JsonRpcChainClient, SubmitParams};

mod logging;

/// Ledger node endpoint that receives the signed transaction.
const RPC_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing();
    // Side-load `.env` when one is present; absence is not an error.
    let _ = dotenvy::dotenv();

    // Credential check comes first: no client is built and no network call
    // is attempted without one.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let chain = match JsonRpcChainClient::new(RPC_ENDPOINT) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            eprintln!("{}", FailureReport::general(error.to_string()));
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(endpoint = RPC_ENDPOINT, "submitting action batch");
    match pipeline::run(chain, &config, &SubmitParams::default()).await {
        Ok(tx_id) => {
            println!("{tx_id}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", FailureReport::from_pipeline_error(&error));
            ExitCode::FAILURE
        }
    }
}
