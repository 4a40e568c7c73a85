//! Pocketfolio Core — pockets, compounding, blended return, projection, KPIs, allocation.
//!
//! This crate contains the wealth-projection engine:
//! - Domain types (pockets, external holdings, price snapshots, projection points)
//! - Compounding engine: one pocket's month-by-month nominal and real balance
//! - Return aggregator: value-weighted blended annual return
//! - Portfolio projector: per-pocket trajectories summed by month index
//! - KPI extractor: value / contributions / interest at 5, 10 and 20 years
//! - Allocation summarizer: current balance breakdown with chart colors
//! - Price sources for externally valued holdings (kept outside the pure engine)
//!
//! Everything except `price` is a pure function of its inputs. The calendar
//! anchor for month labels is always passed in explicitly.

pub mod allocation;
pub mod compounding;
pub mod domain;
pub mod kpi;
pub mod labels;
pub mod numeric;
pub mod price;
pub mod projector;
pub mod returns;

pub use allocation::{allocate, AllocationEntry, PALETTE};
pub use compounding::{project, ProjectionError, ProjectionRequest};
pub use domain::{
    AggregatePoint, ExternalHolding, Pocket, PocketError, PocketSet, Portfolio, PriceSnapshot,
    ProjectionPoint,
};
pub use kpi::{kpi_at_years, Kpi, KPI_HORIZONS};
pub use labels::LabelStyle;
pub use projector::{project_portfolio, AggregatedSeries, PocketSeries, ProjectionSettings};
pub use returns::{global_rate, weighted_return, RateMode, ReturnLeg};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine inputs and outputs are Send + Sync, so a
    /// refresh loop can hand snapshots to another thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Pocket>();
        require_sync::<Pocket>();
        require_send::<PocketSet>();
        require_sync::<PocketSet>();
        require_send::<Portfolio>();
        require_sync::<Portfolio>();
        require_send::<PriceSnapshot>();
        require_sync::<PriceSnapshot>();
        require_send::<AggregatedSeries>();
        require_sync::<AggregatedSeries>();
        require_send::<AllocationEntry>();
        require_sync::<AllocationEntry>();
        require_send::<Kpi>();
        require_sync::<Kpi>();
        require_send::<price::PriceBook>();
        require_sync::<price::PriceBook>();
        require_send::<price::CircuitBreaker>();
        require_sync::<price::CircuitBreaker>();
    }

    /// The engine entry points take no price source: only a frozen snapshot.
    #[test]
    fn projector_takes_snapshot_not_source() {
        fn _check(
            portfolio: &Portfolio,
            prices: &PriceSnapshot,
            settings: &ProjectionSettings,
            anchor: chrono::NaiveDate,
        ) -> Result<AggregatedSeries, ProjectionError> {
            project_portfolio(portfolio, prices, settings, anchor)
        }
    }
}
