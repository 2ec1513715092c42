//! Utils Module - Helper Functions & Shared Utilities
//!
//! Helper functionality shared across the application.
//! Single source of truth for constants, caching, and telemetry.

pub mod cache;
pub mod constants;
pub mod telemetry;

pub use cache::*;
pub use constants::*;
pub use telemetry::*;
