//! Subcommand implementations.

pub mod config;
pub mod grid;
pub mod week;

use tracing::debug;
use weekgrid_providers::{AbortHandle, SourceOverrides};
use weekgrid_server::{WeekData, WeekPipeline};

use crate::config::ClientConfig;

/// Builds the pipeline from `config` and loads the current week.
///
/// Ctrl-C aborts the in-flight fetch; the pipeline then answers with its
/// uncached fallback instead of hanging on the network.
pub async fn load_week(config: &ClientConfig, overrides: &SourceOverrides) -> WeekData {
    let pipeline = WeekPipeline::new(config.source.clone(), config.pipeline_config());

    let handle = AbortHandle::new();
    let trigger = handle.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted; aborting fetch");
            trigger.abort();
        }
    });

    let week = pipeline.load(overrides, &handle.signal()).await;
    watcher.abort();
    week
}
