//! # Infrastructure Layer
//!
//! Adapters at the edges of the valuation core.
//!
//! - [`providers`]: financial data sources (EDGAR, EDINET, in-memory)
//! - [`output`]: report and error-record writers

pub mod output;
pub mod providers;
