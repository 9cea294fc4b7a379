//! # Domain Entities
//!
//! Data carried through a valuation run.
//!
//! ## Inputs
//!
//! - [`CompanyProfile`]: identity and sector
//! - [`RawStatement`], [`NormalizedStatement`]: provider financials
//! - [`Assumptions`], [`AssumptionOverrides`]: modeling parameters
//!
//! ## Outputs
//!
//! - [`DcfInput`], [`DcfResult`], [`SimulationQuantiles`]
//! - [`ValuationReport`]: final, immutable result

pub mod assumptions;
pub mod company_profile;
pub mod report;
pub mod statement;
pub mod valuation;

pub use assumptions::{AssumptionDefaults, AssumptionOverrides, Assumptions};
pub use company_profile::CompanyProfile;
pub use report::{Scores, ValuationReport};
pub use statement::{NormalizedStatement, RawStatement};
pub use valuation::{DcfInput, DcfResult, SimulationQuantiles};
