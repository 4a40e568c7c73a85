//! Price sources for externally valued holdings.
//!
//! The engine only ever sees a [`PriceSnapshot`](crate::domain::PriceSnapshot).
//! Fetching, retries and rate-limit protection live here, outside the pure
//! computation.

pub mod book;
pub mod circuit_breaker;
pub mod coingecko;
pub mod source;

pub use book::{PriceBook, RefreshOutcome};
pub use circuit_breaker::CircuitBreaker;
pub use coingecko::CoinGeckoProvider;
pub use source::{PriceError, PriceSource, StaticPrices};
