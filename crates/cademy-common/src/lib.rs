//! Shared utilities for the cleansing workspace.
//!
//! This crate provides common utilities used across the workspace,
//! mostly Polars `AnyValue` helpers.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{any_to_string, any_to_string_non_empty, format_numeric, is_missing_marker};
