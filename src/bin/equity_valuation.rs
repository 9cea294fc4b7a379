//! `equity-valuation` command line.

use equity_valuation::api::cli::{CliOptions, run_cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let code = run_cli(std::env::args_os(), CliOptions::default().with_logging()).await;
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
