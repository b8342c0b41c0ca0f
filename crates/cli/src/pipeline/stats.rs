//! Run statistics reported at pipeline exit.

use std::collections::HashMap;
use std::time::Duration;

use contracts::SinkRole;
use dispatcher::{DrainStats, MetricsSnapshot};

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Records drawn from the queue
    pub processed: u64,

    /// Average records per second over the run
    pub throughput: u64,

    /// Resolved successful deliveries per sink role
    pub success: HashMap<SinkRole, u64>,

    /// Terminal failures per sink role
    pub fail: HashMap<SinkRole, u64>,

    /// Dead-letter roster size at exit
    pub dlq_records: usize,

    /// Whether every dispatch resolved inside the shutdown budget
    pub clean_drain: bool,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunStats {
    /// Assemble run statistics from the component snapshots.
    pub fn collect(
        snapshot: MetricsSnapshot,
        dlq_records: usize,
        drain: DrainStats,
        duration: Duration,
    ) -> Self {
        Self {
            processed: snapshot.processed,
            throughput: snapshot.throughput,
            success: snapshot.success,
            fail: snapshot.fail,
            dlq_records,
            clean_drain: drain.clean_drain,
            duration,
        }
    }

    /// Print the final counters.
    pub fn print_summary(&self) {
        println!("\n=== Final metrics ===");
        println!("  Records processed: {}", self.processed);
        println!("  Average throughput: {} records/sec", self.throughput);
        for role in SinkRole::ALL {
            let success = self.success.get(&role).copied().unwrap_or(0);
            let fail = self.fail.get(&role).copied().unwrap_or(0);
            println!("  {:<4} success: {:<8} failed: {}", role, success, fail);
        }
        println!("  DLQ records: {}", self.dlq_records);
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        if !self.clean_drain {
            println!("  (shutdown budget exceeded; some dispatches were abandoned)");
        }
        println!("=====================\n");
    }
}
