//! # Eligibility
//!
//! Rejects companies whose sector the DCF model does not fit.
//!
//! Balance-sheet driven businesses (banks, insurers, brokers and similar)
//! are excluded by case-insensitive substring match on the sector.

use crate::domain::entities::CompanyProfile;
use crate::domain::errors::{DomainError, DomainResult};

/// Lower-case fragments that disqualify a sector.
pub const DISALLOWED_SECTOR_PATTERNS: [&str; 6] = [
    "bank",
    "insurance",
    "insurer",
    "securit",
    "broker",
    "financial",
];

/// Returns true if the sector may be valued.
#[must_use]
pub fn is_eligible_sector(sector: &str) -> bool {
    let lowered = sector.to_lowercase();
    !DISALLOWED_SECTOR_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Validates that the company's sector is supported.
///
/// # Errors
///
/// Returns [`DomainError::UnsupportedSector`] carrying the sector string.
pub fn validate(profile: &CompanyProfile) -> DomainResult<()> {
    if is_eligible_sector(profile.sector()) {
        Ok(())
    } else {
        Err(DomainError::unsupported_sector(profile.sector()))
    }
}
