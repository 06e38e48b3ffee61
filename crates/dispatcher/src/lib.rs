//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 将合并表编码为 CSV
//! - 把 `AlignmentReport` fan-out 到多个 sinks
//! - 每个 sink 独立队列与 worker，失败统一汇报

pub mod dispatcher;
pub mod encode;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{AlignmentReport, TableSink};
pub use dispatcher::{create_dispatcher, DispatchSummary, Dispatcher, DispatcherConfig};
pub use encode::{encode_csv, format_number, write_csv, write_series_csv};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSink, FileSinkConfig, LogSink, StdoutSink};
