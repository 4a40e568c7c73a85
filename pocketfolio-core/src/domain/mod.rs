//! Domain types for Pocketfolio

pub mod holding;
pub mod pocket;
pub mod portfolio;
pub mod projection;

pub use holding::{ExternalHolding, PriceSnapshot};
pub use pocket::{Pocket, PocketError, PocketKey, PocketSet};
pub use portfolio::Portfolio;
pub use projection::{AggregatePoint, ProjectionPoint};
