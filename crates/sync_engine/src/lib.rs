//! # Sync Engine
//!
//! Numerical alignment of two independently clocked speed logs.
//!
//! Responsibilities:
//! - Resample each raw series onto a uniform grid (linear interpolation)
//! - Estimate the constant offset between the grids (cross-correlation)
//! - Merge both grids at that offset into one synchronized table
//!
//! ## Usage Example
//!
//! ```ignore
//! use sync_engine::{EngineConfig, NoProgress, SyncEngine};
//!
//! let engine = SyncEngine::new(EngineConfig {
//!     resample_interval: 0.1,
//!     ..Default::default()
//! });
//!
//! let report = engine.run(&tabular, &tagged, &NoProgress)?;
//! println!("offset = {:.3}s, rows = {}", report.offset, report.table.len());
//! ```

mod engine;
mod merge;
mod offset;
mod resample;

// Re-exports
pub use contracts::{DuplicatePolicy, EngineConfig, MergeConfig, NoProgress, ProgressSink};
pub use engine::SyncEngine;
pub use merge::{format_grid_time, Merger};
pub use offset::{OffsetEstimate, OffsetFinder};
pub use resample::Resampler;

// Re-export contracts types
pub use contracts::{AlignmentReport, MergedTable, OffsetSource, RawSeries, UniformSeries};
