//! Grammar analysis: the backtracking matcher and post-success dispatch
//!
//! `engine` holds the recursive matcher, the algorithmic heart of the crate;
//! `events` is the small pass that fires registered callbacks once the engine
//! has accepted a stream.

pub mod engine;
pub mod events;

pub use engine::{Analyzer, DEFAULT_DEPTH_LIMIT};
pub use events::dispatch;
