//! # Application Layer
//!
//! Use-case orchestration on top of the domain core.
//!
//! - [`error`]: stage-tagged application errors and error records
//! - [`services`]: valuation pipeline, signal sources, disclosure monitor

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, ErrorRecord, Stage};
pub use services::{PipelineConfig, ValuationPipeline, ValuationRequest};
