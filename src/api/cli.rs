//! # Command-Line Front End
//!
//! Parses arguments, runs one valuation and writes its files.
//!
//! ```text
//! equity-valuation AAPL
//! equity-valuation --ticker 7203 --country JP --iterations 5000 --seed 42
//! ```
//!
//! Exit code `0` means `result.json` and `result.csv` were written; exit
//! code `1` means `error.json` was written instead. Both never happen in
//! the same run.

use crate::application::error::{ApplicationError, ErrorRecord, Stage};
use crate::application::services::valuation_pipeline::{ValuationPipeline, ValuationRequest};
use crate::config::AppConfig;
use crate::domain::entities::assumptions::AssumptionOverrides;
use crate::infrastructure::output::report_writer::{OutputConfig, ReportWriter};
use crate::infrastructure::providers::{ProviderRegistry, build_registry};
use crate::telemetry;
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::error;

/// Exit code for a written report.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for a written error record.
pub const EXIT_FAILURE: i32 = 1;

/// Command-line arguments.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(
    name = "equity-valuation",
    version,
    about = "DCF valuation with Monte Carlo sensitivity from regulatory filings"
)]
pub struct Cli {
    /// Ticker to value; the market is inferred from its format.
    #[arg(value_name = "TICKER", conflicts_with = "ticker")]
    pub symbol: Option<String>,

    /// Ticker to value; requires --country.
    #[arg(long)]
    pub ticker: Option<String>,

    /// Market country (US or JP).
    #[arg(long)]
    pub country: Option<String>,

    /// Directory for result and error files.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (TOML, YAML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Monte Carlo iterations.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Simulation seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the simulation on all cores.
    #[arg(long)]
    pub parallel: bool,

    /// Revenue growth override.
    #[arg(long, allow_negative_numbers = true)]
    pub rev_growth: Option<f64>,

    /// EBIT margin override.
    #[arg(long, allow_negative_numbers = true)]
    pub ebit_margin: Option<f64>,

    /// Tax rate override.
    #[arg(long)]
    pub tax_rate: Option<f64>,

    /// Capital expenditure to revenue override.
    #[arg(long)]
    pub capex_ratio: Option<f64>,

    /// Working capital to revenue override.
    #[arg(long, allow_negative_numbers = true)]
    pub working_capital_ratio: Option<f64>,

    /// Discount rate override.
    #[arg(long)]
    pub wacc: Option<f64>,

    /// Terminal growth override.
    #[arg(long, allow_negative_numbers = true)]
    pub terminal_growth: Option<f64>,
}

impl Cli {
    /// Returns the supplied ticker, trimmed and upper-cased, if non-empty.
    #[must_use]
    pub fn supplied_ticker(&self) -> Option<String> {
        self.ticker
            .as_deref()
            .or(self.symbol.as_deref())
            .map(|t| t.trim().to_ascii_uppercase())
            .filter(|t| !t.is_empty())
    }

    /// Collects the assumption overrides.
    #[must_use]
    pub fn overrides(&self) -> AssumptionOverrides {
        AssumptionOverrides {
            rev_growth: self.rev_growth,
            ebit_margin: self.ebit_margin,
            tax_rate: self.tax_rate,
            capex_ratio: self.capex_ratio,
            working_capital_ratio: self.working_capital_ratio,
            wacc: self.wacc,
            terminal_growth: self.terminal_growth,
        }
    }

    /// Builds the valuation request.
    ///
    /// # Errors
    ///
    /// - `missing_required_args` when exactly one of `--ticker` and
    ///   `--country` is present
    /// - `missing_ticker` when no usable ticker was given
    pub fn request(&self) -> Result<ValuationRequest, ApplicationError> {
        match (&self.ticker, &self.country, &self.symbol) {
            (Some(_), None, _) => {
                return Err(ApplicationError::missing_required_args(
                    "--ticker requires --country",
                )
                .at_stage(Stage::Cli));
            }
            (None, Some(_), None) => {
                return Err(ApplicationError::missing_required_args(
                    "--country requires a ticker",
                )
                .at_stage(Stage::Cli));
            }
            _ => {}
        }

        let ticker = self
            .supplied_ticker()
            .ok_or_else(|| ApplicationError::missing_ticker().at_stage(Stage::Cli))?;

        let mut request = ValuationRequest::new(ticker).with_overrides(self.overrides());
        if let Some(country) = &self.country {
            request = request.with_country(country.clone());
        }
        if let Some(iterations) = self.iterations {
            request = request.with_iterations(iterations);
        }
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }
        Ok(request)
    }
}

/// Hooks for embedding and tests.
#[derive(Debug, Default)]
pub struct CliOptions {
    /// Providers to use instead of the configured ones.
    pub registry: Option<ProviderRegistry>,
    /// Output directory when `--output-dir` is not given.
    pub output_dir: Option<PathBuf>,
    /// Install the tracing subscriber from the loaded configuration.
    pub init_logging: bool,
}

impl CliOptions {
    /// Uses `registry` instead of the configured providers.
    #[must_use]
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the fallback output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Installs logging once configuration is loaded.
    #[must_use]
    pub fn with_logging(mut self) -> Self {
        self.init_logging = true;
        self
    }
}

fn first_positional(args: &[OsString]) -> Option<String> {
    args.iter()
        .skip(1)
        .filter_map(|a| a.to_str())
        .find(|a| !a.starts_with('-'))
        .map(|a| a.trim().to_ascii_uppercase())
        .filter(|a| !a.is_empty())
}

async fn write_failure(writer: &ReportWriter, error: ApplicationError, ticker: Option<String>) -> i32 {
    let error = match ticker {
        Some(ticker) => error.at_stage(Stage::Cli).for_ticker(ticker),
        None => error.at_stage(Stage::Cli),
    };
    let record = ErrorRecord::from_error(&error);
    error!(code = %record.code, trace_id = %record.trace_id, message = %record.message, "run failed");
    if let Err(write_error) = writer.write_error(&record).await {
        eprintln!("cannot write error record: {write_error}");
    }
    EXIT_FAILURE
}

/// Runs the command line and returns the process exit code.
///
/// Help and version requests print to stdout and exit `0` without writing
/// files.
pub async fn run_cli<I, T>(args: I, options: CliOptions) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let fallback_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| OutputConfig::default().dir);

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            return EXIT_SUCCESS;
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or("invalid arguments")
                .trim_start_matches("error: ")
                .to_string();
            return write_failure(
                &ReportWriter::new(fallback_dir),
                ApplicationError::missing_required_args(message),
                first_positional(&args),
            )
            .await;
        }
    };

    let ticker = cli.supplied_ticker();
    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let dir = cli.output_dir.clone().unwrap_or(fallback_dir);
            return write_failure(
                &ReportWriter::new(dir),
                ApplicationError::unexpected(format!("invalid configuration: {e}")),
                ticker,
            )
            .await;
        }
    };

    if options.init_logging {
        if let Err(e) = telemetry::init(&config.logging) {
            eprintln!("{e}");
        }
    }

    let writer = ReportWriter::new(
        cli.output_dir
            .clone()
            .or(options.output_dir)
            .unwrap_or_else(|| config.output.dir.clone()),
    );

    let request = match cli.request() {
        Ok(request) => request,
        Err(e) => return write_failure(&writer, e, ticker).await,
    };

    let registry = match options.registry {
        Some(registry) => registry,
        None => match build_registry(&config.providers) {
            Ok(registry) => registry,
            Err(e) => return write_failure(&writer, e.into(), ticker).await,
        },
    };

    let mut pipeline_config = config.valuation;
    if cli.parallel {
        pipeline_config = pipeline_config.with_parallel_simulation(true);
    }
    let pipeline = ValuationPipeline::new(registry, pipeline_config);

    let report = match pipeline.run(&request).await {
        Ok(report) => report,
        Err(e) => return write_failure(&writer, e, ticker).await,
    };

    match writer.write_report(&report).await {
        Ok(_) => {
            println!("{report}");
            EXIT_SUCCESS
        }
        Err(e) => {
            write_failure(
                &writer,
                ApplicationError::from(e).at_stage(Stage::WriteReport),
                ticker,
            )
            .await
        }
    }
}
