//! Domain types and pure logic for the SetupHub visualizations service.
//!
//! This crate has no internal dependencies and performs no I/O: it holds the
//! error taxonomy, identifier sanitization, configuration decoding, the
//! composite view types, and the sort/filter/paginate rules.

pub mod configuration;
pub mod error;
pub mod listing;
pub mod rating;
pub mod sanitize;
pub mod types;
pub mod view;
