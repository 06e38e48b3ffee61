//! ProgressSink - one-way status notifications
//!
//! The pipeline calls `report` synchronously between stages. There is no
//! acknowledgment and no backpressure; the caller decides how to surface the
//! message (log line, UI update, nothing).

/// Receiver of human-readable status messages
pub trait ProgressSink {
    /// Deliver one status message
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str),
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Progress sink that discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _message: &str) {}
}
