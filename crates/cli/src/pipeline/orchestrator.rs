//! Pipeline orchestrator - coordinates all components.
//!
//! Owns component construction and lifecycle: rate limiters and their refill
//! ticks, sinks, transformers, dead-letter sink, metrics, the record source,
//! and the optional periodic reporter. The fan-out loop itself lives in the
//! dispatcher crate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::SinkRole;
use dispatcher::{
    spawn_refill, DeadLetterSink, DispatchContext, FanOutDispatcher, PipelineMetrics, RateLimiter,
    RunMode, SimulatedSink, SinkHandle, TransformerRegistry,
};
use ingestion::{spawn_source, FileSource, RecordQueue};
use tokio::task::JoinHandle;
use tracing::info;

use super::RunStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Relay configuration (queue, sinks, dlq, input, metrics)
    pub relay: contracts::RelayConfig,

    /// Streaming or bounded test mode
    pub mode: RunMode,

    /// Prometheus exporter port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion.
    pub async fn run(self) -> Result<RunStats> {
        let start_time = Instant::now();
        let relay = &self.config.relay;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)
                .context("Failed to start metrics endpoint")?;
        }

        // Shared fabric
        let queue = RecordQueue::new(relay.queue.capacity);
        let metrics = Arc::new(PipelineMetrics::new());
        let dlq = Arc::new(DeadLetterSink::spawn(&relay.dlq));

        info!(
            queue_capacity = relay.queue.capacity,
            dlq_enabled = dlq.enabled(),
            max_retries = relay.dlq.max_retries,
            "pipeline components initializing"
        );

        // One rate limiter, refill tick, and sink handle per role
        let mut handles = Vec::with_capacity(SinkRole::ALL.len());
        let mut refill_ticks = Vec::with_capacity(SinkRole::ALL.len());
        for role in SinkRole::ALL {
            let limiter = Arc::new(RateLimiter::new(relay.rate_for(role) as usize));
            refill_ticks.push(spawn_refill(Arc::clone(&limiter)));
            let sink = SimulatedSink::for_role(role, limiter);
            handles.push(SinkHandle::spawn(sink, relay.queue.capacity));
            info!(sink = %role, rate_limit = relay.rate_for(role), "sink registered");
        }

        // Record source
        let source = FileSource::from_config(&relay.input);
        let source_task = spawn_source(source, queue.clone());

        // Periodic reporter
        let reporter = (relay.metrics.interval_seconds > 0).then(|| {
            spawn_reporter(
                Duration::from_secs(relay.metrics.interval_seconds),
                Arc::clone(&metrics),
                Arc::clone(&dlq),
                queue.clone(),
            )
        });

        // Fan-out loop; returns after queue drain and dispatch-task drain
        let dispatcher = FanOutDispatcher::new(
            handles,
            DispatchContext {
                transformers: TransformerRegistry::standard(),
                metrics: Arc::clone(&metrics),
                dlq: Arc::clone(&dlq),
                max_retries: relay.dlq.max_retries,
            },
        );
        let drain = dispatcher.run(queue.clone(), self.config.mode).await;

        // Teardown in dependency order: reporter, refill ticks, producer,
        // then the dead-letter writer so queued appends reach disk
        if let Some(reporter) = reporter {
            reporter.abort();
        }
        for tick in refill_ticks {
            tick.abort();
        }
        // In bounded mode the producer may still be parked on a full queue
        source_task.abort();
        dlq.close().await;

        let stats = RunStats::collect(
            metrics.snapshot(),
            dlq.failed_count(),
            drain,
            start_time.elapsed(),
        );

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            processed = stats.processed,
            "pipeline shutdown complete"
        );

        Ok(stats)
    }
}

/// Reporter task: logs counters and publishes Prometheus gauges every tick.
fn spawn_reporter(
    interval: Duration,
    metrics: Arc<PipelineMetrics>,
    dlq: Arc<DeadLetterSink>,
    queue: RecordQueue,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        tick.tick().await;
        loop {
            tick.tick().await;
            let snapshot = metrics.snapshot();
            let dlq_records = dlq.failed_count();

            info!(
                processed = snapshot.processed,
                throughput = snapshot.throughput,
                success = ?snapshot.success,
                failed = ?snapshot.fail,
                dlq_records,
                queue_depth = queue.len(),
                "metrics report"
            );

            observability::record_pipeline_gauges(snapshot.processed, snapshot.throughput);
            observability::record_queue_depth(queue.len());
            observability::record_dlq_depth(dlq_records);
            for role in SinkRole::ALL {
                observability::record_sink_gauges(
                    role.as_str(),
                    snapshot.success.get(&role).copied().unwrap_or(0),
                    snapshot.fail.get(&role).copied().unwrap_or(0),
                );
            }
        }
    })
}
