//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`Ticker`]: trimmed, upper-cased exchange symbol
//! - [`Country`], [`Market`]: supported jurisdictions and resolution outcome
//!
//! ## Numeric
//!
//! - [`numeric`]: coercion of loosely typed values to finite `f64`
//! - [`RngState`]: explicit-state deterministic uniform stream

pub mod market;
pub mod numeric;
pub mod rng;
pub mod ticker;

pub use market::{Country, Market, MarketSource, ParseCountryError};
pub use numeric::{coerce_finite, coerce_or, finite, finite_or};
pub use rng::RngState;
pub use ticker::Ticker;
