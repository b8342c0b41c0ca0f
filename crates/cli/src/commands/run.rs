//! The `run` command: wire the pipeline and drive it to completion.

use anyhow::Result;
use config_loader::ConfigLoader;
use dispatcher::RunMode;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the fan-out pipeline.
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    // Missing or malformed configuration falls back to the documented
    // defaults; load_or_default logs the fallback once
    let relay = ConfigLoader::load_or_default(&args.config);

    let mode = if args.test_mode {
        info!(records = args.records, "running in bounded test mode");
        RunMode::Bounded(args.records)
    } else {
        RunMode::Streaming
    };

    let pipeline = Pipeline::new(PipelineConfig {
        relay,
        mode,
        metrics_port: (args.metrics_port != 0).then_some(args.metrics_port),
    });

    let stats = pipeline
        .run()
        .await
        .map_err(|e| CliError::pipeline_execution(e.to_string()))?;

    stats.print_summary();
    Ok(())
}
