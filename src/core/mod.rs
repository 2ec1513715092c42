//! Core Module - Scoring Engine Internals
//!
//! Feature synthesis, model adapter, interpreter, heuristics, and the
//! scoring facade that ties them together.

pub mod features;
pub mod heuristics;
pub mod interpreter;
pub mod model;
pub mod scoring;

pub use features::*;
pub use heuristics::*;
pub use interpreter::*;
pub use model::*;
pub use scoring::*;
