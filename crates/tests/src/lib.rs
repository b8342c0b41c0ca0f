//! # Integration Tests
//!
//! End-to-end scenarios over the full fan-out fabric:
//! source -> bounded queue -> dispatcher -> sinks / dead-letter capture.

#[cfg(test)]
mod scenario_tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{ContractError, DlqConfig, SinkRole, Transformer};
    use dispatcher::{
        spawn_refill, DeadLetterSink, DispatchContext, FanOutDispatcher, MockSink,
        PipelineMetrics, RateLimiter, RunMode, SinkHandle, TransformerRegistry,
    };
    use ingestion::{spawn_source, MockSource, RecordQueue};

    fn dlq_at(dir: &tempfile::TempDir) -> (Arc<DeadLetterSink>, std::path::PathBuf) {
        let path = dir.path().join("failed-records.jsonl");
        let dlq = Arc::new(DeadLetterSink::spawn(&DlqConfig {
            enabled: true,
            file_path: path.clone(),
            max_retries: 3,
        }));
        (dlq, path)
    }

    fn dispatcher_with(
        handles: Vec<SinkHandle>,
        dlq: Arc<DeadLetterSink>,
        transformers: TransformerRegistry,
    ) -> FanOutDispatcher {
        FanOutDispatcher::new(
            handles,
            DispatchContext {
                transformers,
                metrics: Arc::new(PipelineMetrics::new()),
                dlq,
                max_retries: 3,
            },
        )
    }

    /// S1 - happy path: bounded mode, 3 records, 4 sinks, everything lands.
    #[tokio::test]
    async fn test_happy_path_all_sinks_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let (dlq, dlq_path) = dlq_at(&dir);

        let handles = SinkRole::ALL
            .map(|role| SinkHandle::spawn(MockSink::succeeding(role), 16))
            .into_iter()
            .collect();
        let dispatcher = dispatcher_with(handles, Arc::clone(&dlq), TransformerRegistry::standard());
        let ctx = dispatcher.context();

        let queue = RecordQueue::new(16);
        spawn_source(MockSource::sequential(3), queue.clone());

        let stats = dispatcher.run(queue, RunMode::Bounded(3)).await;
        dlq.close().await;

        assert_eq!(stats.records, 3);
        assert!(stats.clean_drain);
        assert_eq!(ctx.metrics.processed(), 3);
        for role in SinkRole::ALL {
            assert_eq!(ctx.metrics.success(role), 3, "success[{role}]");
            assert_eq!(ctx.metrics.fail(role), 0, "fail[{role}]");
        }
        assert_eq!(dlq.failed_count(), 0);
        let content = std::fs::read_to_string(&dlq_path).unwrap_or_default();
        assert!(content.is_empty());
    }

    /// S2 - terminal sink failure: one hopeless sink exhausts its retries
    /// and lands in the dead-letter log with the ceiling as `attempts`.
    #[tokio::test]
    async fn test_terminal_sink_failure_dead_letters() {
        let dir = tempfile::tempdir().unwrap();
        let (dlq, dlq_path) = dlq_at(&dir);

        let handles = vec![
            SinkHandle::spawn(MockSink::soft_failing(SinkRole::Rest), 16),
            SinkHandle::spawn(MockSink::succeeding(SinkRole::Grpc), 16),
            SinkHandle::spawn(MockSink::succeeding(SinkRole::Mq), 16),
            SinkHandle::spawn(MockSink::succeeding(SinkRole::Db), 16),
        ];
        let dispatcher = dispatcher_with(handles, Arc::clone(&dlq), TransformerRegistry::standard());
        let ctx = dispatcher.context();

        let queue = RecordQueue::new(16);
        spawn_source(MockSource::new(vec!["{\"id\":42}".into()]), queue.clone());

        dispatcher.run(queue, RunMode::Streaming).await;
        dlq.close().await;

        assert_eq!(ctx.metrics.processed(), 1);
        assert_eq!(ctx.metrics.fail(SinkRole::Rest), 1);
        for role in [SinkRole::Grpc, SinkRole::Mq, SinkRole::Db] {
            assert_eq!(ctx.metrics.success(role), 1);
        }
        assert_eq!(dlq.failed_count(), 1);

        let content = std::fs::read_to_string(&dlq_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["sink"], "REST");
        assert_eq!(parsed["attempts"], 3);
        assert_eq!(parsed["record"]["id"], 42);
    }

    struct BrokenTransformer;

    impl Transformer for BrokenTransformer {
        fn transform(&self, _record: &str) -> Result<String, ContractError> {
            Err(ContractError::transform(SinkRole::Grpc, "schema mismatch"))
        }
    }

    /// S3 - transform error: terminal with zero attempts, no send made.
    #[tokio::test]
    async fn test_transform_error_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let (dlq, dlq_path) = dlq_at(&dir);

        let sink = MockSink::succeeding(SinkRole::Grpc);
        let calls = sink.calls();

        let mut transformers = TransformerRegistry::empty();
        transformers.register(SinkRole::Grpc, Arc::new(BrokenTransformer));

        let dispatcher = dispatcher_with(
            vec![SinkHandle::spawn(sink, 16)],
            Arc::clone(&dlq),
            transformers,
        );
        let ctx = dispatcher.context();

        let queue = RecordQueue::new(16);
        spawn_source(MockSource::new(vec!["{\"id\":1}".into()]), queue.clone());

        dispatcher.run(queue, RunMode::Streaming).await;
        dlq.close().await;

        assert_eq!(ctx.metrics.fail(SinkRole::Grpc), 1);
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        let content = std::fs::read_to_string(&dlq_path).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(parsed["attempts"], 0);
        assert!(parsed["error"]
            .as_str()
            .unwrap()
            .starts_with("Transformation failed"));
    }

    /// S4 - rate ceiling: 200 records through one sink at 50 permits/sec
    /// cannot finish faster than the burst-aware lower bound.
    #[tokio::test]
    async fn test_rate_ceiling_paces_throughput() {
        let limiter = Arc::new(RateLimiter::new(50));
        let refill = spawn_refill(Arc::clone(&limiter));

        let sink = MockSink::succeeding(SinkRole::Db).with_limiter(limiter);
        let dispatcher = dispatcher_with(
            vec![SinkHandle::spawn(sink, 256)],
            Arc::new(DeadLetterSink::disabled()),
            TransformerRegistry::standard(),
        );
        let ctx = dispatcher.context();

        let queue = RecordQueue::new(256);
        spawn_source(MockSource::sequential(200), queue.clone());

        let start = std::time::Instant::now();
        dispatcher.run(queue, RunMode::Bounded(200)).await;
        let elapsed = start.elapsed();
        refill.abort();

        assert_eq!(ctx.metrics.success(SinkRole::Db), 200);
        // ceil(200 / 50) - 1 = 3 seconds
        assert!(
            elapsed >= Duration::from_secs(3),
            "finished too fast: {elapsed:?}"
        );
    }

    /// S5 - disabled DLQ: failures leave no trace anywhere.
    #[tokio::test]
    async fn test_disabled_dlq_stays_empty() {
        let dlq = Arc::new(DeadLetterSink::spawn(&DlqConfig {
            enabled: false,
            file_path: std::path::PathBuf::from("must/not/exist.jsonl"),
            max_retries: 3,
        }));

        let dispatcher = dispatcher_with(
            vec![SinkHandle::spawn(MockSink::soft_failing(SinkRole::Mq), 16)],
            Arc::clone(&dlq),
            TransformerRegistry::standard(),
        );
        let ctx = dispatcher.context();

        let queue = RecordQueue::new(16);
        spawn_source(MockSource::sequential(4), queue.clone());

        dispatcher.run(queue, RunMode::Streaming).await;
        dlq.close().await;

        assert_eq!(ctx.metrics.fail(SinkRole::Mq), 4);
        assert_eq!(dlq.failed_count(), 0);
        assert!(!std::path::Path::new("must/not/exist.jsonl").exists());
    }

    /// S6 - backpressure: a slow consumer holds a 4-slot queue; the producer
    /// never overruns it.
    #[tokio::test]
    async fn test_backpressure_bounds_queue_occupancy() {
        let queue = RecordQueue::new(4);
        let producer = spawn_source(MockSource::sequential(100), queue.clone());

        let mut drained = 0usize;
        let mut peak = 0usize;
        while let Some(_record) = queue.poll(Duration::from_millis(500)).await {
            drained += 1;
            peak = peak.max(queue.len());
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        producer.await.unwrap();

        assert_eq!(drained, 100);
        assert!(peak <= 4, "queue occupancy exceeded capacity: {peak}");
    }
}

#[cfg(test)]
mod property_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{DlqConfig, SinkRole};
    use dispatcher::{
        DeadLetterSink, DispatchContext, FanOutDispatcher, MockSink, PipelineMetrics, RunMode,
        SinkHandle, TransformerRegistry,
    };
    use ingestion::{spawn_source, MockSource, RecordQueue};

    /// Counting law: processed == R and the per-sink outcomes sum to R x S.
    /// DLQ law: the roster size equals the total failure count.
    #[tokio::test]
    async fn test_counting_and_dlq_laws() {
        let records = 20u64;
        let dir = tempfile::tempdir().unwrap();
        let dlq_path = dir.path().join("dlq.jsonl");
        let dlq = Arc::new(DeadLetterSink::spawn(&DlqConfig {
            enabled: true,
            file_path: dlq_path.clone(),
            max_retries: 3,
        }));

        // Two reliable sinks, two hopeless ones
        let handles = vec![
            SinkHandle::spawn(MockSink::succeeding(SinkRole::Rest), 64),
            SinkHandle::spawn(MockSink::succeeding(SinkRole::Grpc), 64),
            SinkHandle::spawn(MockSink::soft_failing(SinkRole::Mq), 64),
            SinkHandle::spawn(MockSink::erroring(SinkRole::Db), 64),
        ];
        let dispatcher = FanOutDispatcher::new(
            handles,
            DispatchContext {
                transformers: TransformerRegistry::standard(),
                metrics: Arc::new(PipelineMetrics::new()),
                dlq: Arc::clone(&dlq),
                max_retries: 3,
            },
        );
        let ctx = dispatcher.context();

        let queue = RecordQueue::new(64);
        spawn_source(MockSource::sequential(records as usize), queue.clone());

        dispatcher.run(queue, RunMode::Streaming).await;
        dlq.close().await;

        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.processed, records);
        assert_eq!(
            snapshot.total_success() + snapshot.total_fail(),
            records * SinkRole::ALL.len() as u64
        );
        assert_eq!(dlq.failed_count() as u64, snapshot.total_fail());
    }

    /// Round-trip law: every durable line parses and carries the five
    /// required fields (records here are valid JSON objects).
    #[tokio::test]
    async fn test_dlq_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dlq_path = dir.path().join("dlq.jsonl");
        let dlq = Arc::new(DeadLetterSink::spawn(&DlqConfig {
            enabled: true,
            file_path: dlq_path.clone(),
            max_retries: 3,
        }));

        let dispatcher = FanOutDispatcher::new(
            vec![SinkHandle::spawn(MockSink::soft_failing(SinkRole::Rest), 64)],
            DispatchContext {
                transformers: TransformerRegistry::standard(),
                metrics: Arc::new(PipelineMetrics::new()),
                dlq: Arc::clone(&dlq),
                max_retries: 3,
            },
        );

        let queue = RecordQueue::new(64);
        spawn_source(MockSource::sequential(5), queue.clone());
        dispatcher.run(queue, RunMode::Streaming).await;
        dlq.close().await;

        let content = std::fs::read_to_string(&dlq_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            for key in ["record", "sink", "attempts", "error", "timestamp"] {
                assert!(parsed.get(key).is_some(), "missing key {key}");
            }
        }
    }

    /// No-loss law under a mixed workload: every (record, sink) pair either
    /// succeeds or appears in the dead-letter roster under that role.
    #[tokio::test]
    async fn test_no_loss_accounting() {
        let dlq = Arc::new(DeadLetterSink::disabled());
        let handles = vec![
            SinkHandle::spawn(MockSink::succeeding(SinkRole::Rest), 64),
            SinkHandle::spawn(MockSink::soft_failing(SinkRole::Db), 64),
        ];
        let dispatcher = FanOutDispatcher::new(
            handles,
            DispatchContext {
                transformers: TransformerRegistry::standard(),
                metrics: Arc::new(PipelineMetrics::new()),
                dlq,
                max_retries: 2,
            },
        );
        let ctx = dispatcher.context();

        let queue = RecordQueue::new(8);
        spawn_source(MockSource::sequential(12), queue.clone());
        dispatcher.run(queue, RunMode::Streaming).await;

        assert_eq!(ctx.metrics.success(SinkRole::Rest), 12);
        assert_eq!(ctx.metrics.fail(SinkRole::Rest), 0);
        assert_eq!(ctx.metrics.success(SinkRole::Db), 0);
        assert_eq!(ctx.metrics.fail(SinkRole::Db), 12);
    }

    /// Bounded-memory law: occupancy stays within capacity while the
    /// dispatcher is slower than the producer.
    #[tokio::test]
    async fn test_queue_occupancy_never_exceeds_capacity() {
        let queue = RecordQueue::new(8);
        let producer = spawn_source(MockSource::sequential(50), queue.clone());

        let mut observations = Vec::new();
        loop {
            observations.push(queue.len());
            match queue.poll(Duration::from_millis(200)).await {
                Some(_) => tokio::time::sleep(Duration::from_millis(1)).await,
                None => break,
            }
        }
        producer.await.unwrap();

        assert!(observations.iter().all(|&len| len <= 8));
    }
}
