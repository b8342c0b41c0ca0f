//! Pipeline metrics - monotonic delivery counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Instant;

use contracts::SinkRole;

/// Process-wide counters for the fan-out pipeline.
///
/// `processed` counts records drawn from the queue, incremented exactly once
/// per record before fan-out. Per-role success/failure counters are created
/// lazily on first increment.
#[derive(Debug)]
pub struct PipelineMetrics {
    processed: AtomicU64,
    success: RwLock<HashMap<SinkRole, AtomicU64>>,
    fail: RwLock<HashMap<SinkRole, AtomicU64>>,
    start: Instant,
}

impl PipelineMetrics {
    /// Create a fresh counter set; the wall clock for throughput starts now.
    pub fn new() -> Self {
        Self {
            processed: AtomicU64::new(0),
            success: RwLock::new(HashMap::new()),
            fail: RwLock::new(HashMap::new()),
            start: Instant::now(),
        }
    }

    /// One record drawn from the queue.
    pub fn inc_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Total records drawn from the queue.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// One resolved successful delivery for `role`.
    pub fn inc_success(&self, role: SinkRole) {
        bump(&self.success, role);
    }

    /// One terminal failure for `role`.
    pub fn inc_fail(&self, role: SinkRole) {
        bump(&self.fail, role);
    }

    /// Successful deliveries for `role`.
    pub fn success(&self, role: SinkRole) -> u64 {
        read(&self.success, role)
    }

    /// Terminal failures for `role`.
    pub fn fail(&self, role: SinkRole) -> u64 {
        read(&self.fail, role)
    }

    /// Records per second since construction.
    pub fn throughput(&self) -> u64 {
        let elapsed = self.start.elapsed().as_secs();
        self.processed() / elapsed.max(1)
    }

    /// Copy of every counter, for reporting.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            processed: self.processed(),
            throughput: self.throughput(),
            success: copy_map(&self.success),
            fail: copy_map(&self.fail),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(map: &RwLock<HashMap<SinkRole, AtomicU64>>, role: SinkRole) {
    {
        let counters = map.read().expect("metrics map poisoned");
        if let Some(counter) = counters.get(&role) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
    }
    map.write()
        .expect("metrics map poisoned")
        .entry(role)
        .or_insert_with(|| AtomicU64::new(0))
        .fetch_add(1, Ordering::Relaxed);
}

fn read(map: &RwLock<HashMap<SinkRole, AtomicU64>>, role: SinkRole) -> u64 {
    map.read()
        .expect("metrics map poisoned")
        .get(&role)
        .map(|counter| counter.load(Ordering::Relaxed))
        .unwrap_or(0)
}

fn copy_map(map: &RwLock<HashMap<SinkRole, AtomicU64>>) -> HashMap<SinkRole, u64> {
    map.read()
        .expect("metrics map poisoned")
        .iter()
        .map(|(role, counter)| (*role, counter.load(Ordering::Relaxed)))
        .collect()
}

/// Snapshot of pipeline metrics (for reporting).
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub processed: u64,
    pub throughput: u64,
    pub success: HashMap<SinkRole, u64>,
    pub fail: HashMap<SinkRole, u64>,
}

impl MetricsSnapshot {
    /// Sum of successful deliveries across roles.
    pub fn total_success(&self) -> u64 {
        self.success.values().sum()
    }

    /// Sum of terminal failures across roles.
    pub fn total_fail(&self) -> u64 {
        self.fail.values().sum()
    }
}
