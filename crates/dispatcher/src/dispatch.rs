//! Per-(record, sink) dispatch with bounded retries.
//!
//! One invocation covers the full lifecycle of a single record against a
//! single sink: transform, retry loop, and terminal accounting. Failures
//! never cross (record, sink) boundaries; a failing dispatch never cancels
//! siblings.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::dlq::DeadLetterSink;
use crate::handle::SinkClient;
use crate::metrics::PipelineMetrics;
use crate::transform::TransformerRegistry;

/// Shared collaborators for every dispatch task.
pub struct DispatchContext {
    pub transformers: TransformerRegistry,
    pub metrics: Arc<PipelineMetrics>,
    pub dlq: Arc<DeadLetterSink>,
    /// Retry ceiling per (record, sink)
    pub max_retries: u32,
}

/// Deliver one record to one sink.
///
/// The transformer is selected by the sink's role; an unregistered role
/// passes the record through unchanged. A transform error is terminal with
/// zero attempts. Soft failures (`Ok(false)` or any send error) retry
/// immediately up to the ceiling; exhaustion dead-letters the record with
/// `attempts` equal to the ceiling. Exactly one of `success[role]` /
/// `fail[role]` is incremented per call.
#[instrument(
    name = "dispatch_record",
    skip(ctx, client, record),
    fields(sink = %client.role(), record_len = record.len())
)]
pub async fn dispatch_record(ctx: Arc<DispatchContext>, client: SinkClient, record: String) {
    let role = client.role();

    let payload = match ctx.transformers.get(role) {
        Some(transformer) => match transformer.transform(&record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(sink = %role, error = %e, "transform failed, dead-lettering");
                ctx.dlq
                    .record_failure(&record, role, 0, format!("Transformation failed: {e}"))
                    .await;
                ctx.metrics.inc_fail(role);
                return;
            }
        },
        None => record.clone(),
    };

    for attempt in 1..=ctx.max_retries {
        match client.send(payload.clone()).await {
            Ok(true) => {
                ctx.metrics.inc_success(role);
                return;
            }
            Ok(false) => {
                warn!(sink = %role, attempt, "soft failure, retrying");
            }
            Err(e) => {
                warn!(sink = %role, attempt, error = %e, "send error, retrying");
            }
        }
    }

    ctx.dlq
        .record_failure(
            &record,
            role,
            ctx.max_retries,
            format!("Max retries ({}) exceeded", ctx.max_retries),
        )
        .await;
    ctx.metrics.inc_fail(role);
}
