//! Data layer for the healthcare billing dashboard.
//!
//! Loads the billing CSV into an immutable [`dataset::Dataset`] and exposes
//! the aggregation [`pipeline::Pipeline`] that turns it plus a set of filter
//! parameters into chart-ready series.

pub mod dataset;
pub mod histogram;
pub mod pipeline;
pub mod reader;
pub mod summary;
