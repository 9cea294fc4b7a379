//! # Output
//!
//! Report and error-record files.

pub mod error;
pub mod report_writer;

pub use error::{OutputError, OutputResult};
pub use report_writer::{OutputConfig, ReportPaths, ReportWriter};
