//! Dispatcher - fan-out of one alignment report to every configured sink

use std::sync::Arc;

use tracing::{info, instrument, warn};

use contracts::{AlignmentReport, SinkConfig, SinkType};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{FileSink, LogSink, StdoutSink};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
}

/// Per-sink outcome of a dispatch
#[derive(Debug, Clone)]
pub struct DispatchSummary {
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

impl DispatchSummary {
    /// Names of sinks that reported any failure
    pub fn failed(&self) -> Vec<String> {
        self.sinks
            .iter()
            .filter(|(_, m)| !m.is_ok())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Create a SinkHandle from configuration
#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink_handle(config: &SinkConfig) -> Result<SinkHandle, DispatcherError> {
    match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&config.name);
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        SinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        SinkType::Stdout => {
            let sink = StdoutSink::new(&config.name);
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
    }
}

/// Fans alignment reports out to sink workers
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
}

impl Dispatcher {
    /// Start one worker per configured sink
    ///
    /// Must be called inside a Tokio runtime.
    #[instrument(
        name = "dispatcher_from_config",
        skip(config),
        fields(sink_count = config.sinks.len())
    )]
    pub fn from_config(config: &DispatcherConfig) -> Result<Self, DispatcherError> {
        let mut handles = Vec::with_capacity(config.sinks.len());
        for sink_config in &config.sinks {
            handles.push(create_sink_handle(sink_config)?);
        }
        Ok(Self { handles })
    }

    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>) -> Self {
        Self { handles }
    }

    /// Names of the attached sinks
    pub fn sink_names(&self) -> Vec<&str> {
        self.handles.iter().map(SinkHandle::name).collect()
    }

    /// Deliver `report` to every sink, then shut all workers down.
    ///
    /// Every sink gets the report even if another one fails; failures are
    /// collected and returned together.
    #[instrument(name = "dispatcher_dispatch", skip(self, report), fields(rows = report.table.len()))]
    pub async fn dispatch(
        self,
        report: AlignmentReport,
    ) -> Result<DispatchSummary, DispatcherError> {
        info!(sinks = self.handles.len(), "Dispatching alignment report");

        let report = Arc::new(report);
        for handle in &self.handles {
            if let Err(e) = handle.send(Arc::clone(&report)).await {
                warn!(sink = %handle.name(), error = %e, "Report not delivered");
            }
        }

        let mut sinks = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let name = handle.name().to_string();
            let snapshot = handle.shutdown().await;
            observability::record_table_dispatched(&name, snapshot.is_ok());
            sinks.push((name, snapshot));
        }

        let summary = DispatchSummary { sinks };
        let failed = summary.failed();
        if !failed.is_empty() {
            return Err(DispatcherError::SinkFailures { failed });
        }

        info!(sinks = summary.sinks.len(), "Dispatcher shutdown complete");
        Ok(summary)
    }
}

/// Convenience function to create a dispatcher from sink configs
pub fn create_dispatcher(sink_configs: Vec<SinkConfig>) -> Result<Dispatcher, DispatcherError> {
    Dispatcher::from_config(&DispatcherConfig {
        sinks: sink_configs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::tests::{sample_report, MockSink};
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test]
    async fn test_dispatcher_fanout() {
        let count1 = Arc::new(AtomicU64::new(0));
        let count2 = Arc::new(AtomicU64::new(0));

        let handles = vec![
            SinkHandle::spawn(MockSink::new("sink1", Arc::clone(&count1)), 4),
            SinkHandle::spawn(MockSink::new("sink2", Arc::clone(&count2)), 4),
        ];

        let summary = Dispatcher::with_handles(handles)
            .dispatch(sample_report())
            .await
            .unwrap();

        assert_eq!(count1.load(Ordering::Relaxed), 1);
        assert_eq!(count2.load(Ordering::Relaxed), 1);
        assert_eq!(summary.sinks.len(), 2);
        assert!(summary.failed().is_empty());
    }

    #[tokio::test]
    async fn test_dispatcher_reports_failures_after_delivering_to_all() {
        let healthy = Arc::new(AtomicU64::new(0));
        let mut failing = MockSink::new("broken", Arc::new(AtomicU64::new(0)));
        failing.should_fail = true;

        let handles = vec![
            SinkHandle::spawn(failing, 4),
            SinkHandle::spawn(MockSink::new("healthy", Arc::clone(&healthy)), 4),
        ];

        let err = Dispatcher::with_handles(handles)
            .dispatch(sample_report())
            .await
            .unwrap_err();

        assert_eq!(healthy.load(Ordering::Relaxed), 1);
        match err {
            DispatcherError::SinkFailures { failed } => assert_eq!(failed, vec!["broken"]),
            other => panic!("unexpected: {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_dispatcher_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");

        let configs = vec![
            SinkConfig::new("test_log", SinkType::Log),
            SinkConfig::new("out", SinkType::File).with_param("path", path.display().to_string()),
        ];

        let dispatcher = create_dispatcher(configs).unwrap();
        assert_eq!(dispatcher.sink_names(), vec!["test_log", "out"]);

        dispatcher.dispatch(sample_report()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_file_sink_without_path_fails_creation() {
        let configs = vec![SinkConfig::new("out", SinkType::File)];
        let err = create_dispatcher(configs).err().unwrap();
        assert!(matches!(err, DispatcherError::SinkCreation { .. }));
    }
}
