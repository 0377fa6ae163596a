//! Report export functionality
//!
//! This module provides functionality for exporting the ranked profile to
//! machine-readable formats. Currently supports JSON.

pub mod json_report;

pub use json_report::JsonReportExporter;
