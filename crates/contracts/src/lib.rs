//! # Contracts
//!
//! Frozen interface contracts shared by every speedsync crate: series and
//! table data structures, the job configuration, the error type and the
//! progress/sink traits. Business crates depend only on this crate, never on
//! each other in reverse.
//!
//! ## Time Model
//! - Each input log carries its own clock (seconds, f64); the two clocks are
//!   related by a single constant offset.
//! - A sample index `i` means "sample i", never a timestamp by itself.

mod engine_config;
mod error;
mod job;
mod progress;
mod report;
mod series;
mod sink;
mod table;

pub use engine_config::*;
pub use error::*;
pub use job::*;
pub use progress::{NoProgress, ProgressSink};
pub use report::*;
pub use series::*;
pub use sink::*;
pub use table::*;
