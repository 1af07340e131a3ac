//! Terminal UI layer for the usage dashboard.
//!
//! Provides themes, the filter sidebar and view controls, line / bar /
//! treemap / heatmap charts, and the main application event loop built on
//! top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod dashboard_view;
pub mod overview;
pub mod state;
pub mod themes;

pub use dashboard_core as core;
