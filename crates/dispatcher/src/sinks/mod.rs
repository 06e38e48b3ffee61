//! Sink implementations
//!
//! Contains LogSink, FileSink, and StdoutSink.

mod file;
mod log;
mod stdout;

pub use self::file::{FileSink, FileSinkConfig};
pub use self::log::LogSink;
pub use self::stdout::StdoutSink;

use std::collections::HashMap;

/// Boolean sink parameter (`true`/`1`/`yes`, case-insensitive)
pub(crate) fn param_flag(params: &HashMap<String, String>, key: &str) -> bool {
    params
        .get(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}
