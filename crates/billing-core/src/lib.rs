//! Core types shared by the healthcare billing dashboard crates.
//!
//! Holds the record model, filter and result value objects, the error type,
//! small statistics and date helpers, display formatting and CLI settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;
pub mod time_utils;
