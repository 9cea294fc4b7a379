//! # API Layer
//!
//! Entry points exposed to operators.
//!
//! - [`cli`]: the `equity-valuation` command line

pub mod cli;

pub use cli::{Cli, CliOptions, run_cli};
