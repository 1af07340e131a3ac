//! Shared building blocks for the usage dashboard.
//!
//! Holds the event and category models, the error type, CLI settings with
//! last-used persistence, and time and number formatting helpers used by
//! the data and UI layers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
