//! Single test binary entry point.
//!
//! Structure:
//! - unit: properties of single components (classify, sample, build)
//! - integration: load → sample → build → export workflows

mod helpers;
mod integration;
mod unit;
