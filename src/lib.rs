//! Filtering engine and session state for browsing case-note datasets.

pub mod config;
pub mod data;
pub mod state;
