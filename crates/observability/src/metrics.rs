//! Relay gauge helpers.
//!
//! The pipeline's own counters are plain atomics in the dispatcher crate;
//! these helpers publish periodic snapshots of them to the Prometheus
//! recorder. Call them from the reporter task.

use metrics::gauge;

/// Publish the record-level counters.
pub fn record_pipeline_gauges(processed: u64, throughput: u64) {
    gauge!("fanout_relay_records_processed").set(processed as f64);
    gauge!("fanout_relay_throughput_rps").set(throughput as f64);
}

/// Publish one sink's resolved-outcome counters.
pub fn record_sink_gauges(role: &str, success: u64, fail: u64) {
    gauge!("fanout_relay_sink_success", "sink" => role.to_string()).set(success as f64);
    gauge!("fanout_relay_sink_fail", "sink" => role.to_string()).set(fail as f64);
}

/// Publish the current bounded-queue occupancy.
pub fn record_queue_depth(depth: usize) {
    gauge!("fanout_relay_queue_depth").set(depth as f64);
}

/// Publish the dead-letter roster size.
pub fn record_dlq_depth(count: usize) {
    gauge!("fanout_relay_dlq_records").set(count as f64);
}
