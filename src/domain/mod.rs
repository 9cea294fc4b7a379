//! # Domain Layer
//!
//! Valuation core: value objects, entities, services and their errors.
//!
//! Nothing in this layer performs I/O or suspends; the application layer
//! feeds it data fetched through infrastructure ports.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult, ErrorCode};
