//! Preference record for the filter overlay
//!
//! - **record**: the in-memory `Configuration` plus the JSON codec that
//!   reads every historical record shape (including pre-scope records)

pub mod record;

pub use record::{Configuration, RecordError};
