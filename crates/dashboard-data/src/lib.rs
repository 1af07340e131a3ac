//! Data layer for the usage dashboard.
//!
//! Loads the CSV usage log and the JSON category map, assigns categories,
//! applies the sidebar filters and aggregates the result into chart-ready
//! views.

pub mod aggregator;
pub mod categorizer;
pub mod filter;
pub mod reader;
pub mod session;
pub mod views;

pub use dashboard_core as core;
