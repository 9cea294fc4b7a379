//! # Market Resolver
//!
//! Maps a ticker to the jurisdiction whose filings describe it.
//!
//! The default policy is purely syntactic:
//!
//! | Ticker shape | Market |
//! |---|---|
//! | exactly four ASCII digits (`7203`) | [`Country::Jp`] |
//! | 1-10 of letters, `.` or `-`, at least one letter (`BRK.B`) | [`Country::Us`] |
//! | anything else | `market_resolution_failed` |
//!
//! Implement [`MarketResolver`] to plug in a different policy.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::services::market_resolver::{DefaultMarketResolver, MarketResolver};
//! use equity_valuation::domain::value_objects::{Country, Ticker};
//!
//! let resolver = DefaultMarketResolver;
//! let market = resolver.resolve(&Ticker::new("7203").unwrap()).unwrap();
//! assert_eq!(market.country(), Country::Jp);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Country, Market, Ticker};
use std::fmt;

const MAX_US_TICKER_LEN: usize = 10;

/// Resolves the market of a ticker.
pub trait MarketResolver: Send + Sync + fmt::Debug {
    /// Resolves the market for `ticker`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MarketResolutionFailed`] when no market applies.
    fn resolve(&self, ticker: &Ticker) -> DomainResult<Market>;
}

/// Format-based resolver for US and JP tickers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMarketResolver;

impl DefaultMarketResolver {
    fn is_jp(symbol: &str) -> bool {
        symbol.len() == 4 && symbol.bytes().all(|b| b.is_ascii_digit())
    }

    fn is_us(symbol: &str) -> bool {
        (1..=MAX_US_TICKER_LEN).contains(&symbol.len())
            && symbol
                .bytes()
                .all(|b| b.is_ascii_alphabetic() || b == b'.' || b == b'-')
            && symbol.bytes().any(|b| b.is_ascii_alphabetic())
    }
}

impl MarketResolver for DefaultMarketResolver {
    fn resolve(&self, ticker: &Ticker) -> DomainResult<Market> {
        let symbol = ticker.as_str();
        if Self::is_jp(symbol) {
            Ok(Market::resolved(Country::Jp))
        } else if Self::is_us(symbol) {
            Ok(Market::resolved(Country::Us))
        } else {
            Err(DomainError::market_resolution_failed(symbol))
        }
    }
}

/// Parses a caller-supplied country, bypassing any resolver.
///
/// # Errors
///
/// Returns [`DomainError::MarketResolutionFailed`] naming the ticker when the
/// country is not supported.
pub fn market_from_override(ticker: &Ticker, country: &str) -> DomainResult<Market> {
    country
        .parse::<Country>()
        .map(Market::overridden)
        .map_err(|_| DomainError::market_resolution_failed(ticker.as_str()))
}
