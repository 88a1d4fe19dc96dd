//! Aggregation engine.
//!
//! [`Aggregator`] combines one configuration with its ratings, comments,
//! likes and resolved identities. [`Catalog`] sits on top: it fetches from
//! the configuration store, filters, enriches in bulk, sorts and windows.

pub mod aggregate;
pub mod browse;

pub use aggregate::Aggregator;
pub use browse::{Catalog, SearchFilters, Window};
