//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ValuationPipeline`]: end-to-end valuation of one company
//! - [`SignalSource`]: tracking and fundamental signals for scoring
//! - [`disclosure_monitor`]: detects newly filed disclosures

pub mod disclosure_monitor;
pub mod signal_source;
pub mod valuation_pipeline;

pub use disclosure_monitor::{FilingRef, changed_tickers};
pub use signal_source::{FixedSignalSource, SignalSource};
pub use valuation_pipeline::{PipelineConfig, ValuationPipeline, ValuationRequest};
