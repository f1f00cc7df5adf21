//! Utility modules
//!
//! This module contains shared utilities for error handling, logging,
//! and the wire date/time format.

pub mod datetime;
pub mod errors;
pub mod logging;

pub use errors::{ExploreError, Result};
