// salesmart-core/src/application/pipeline.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::application::loader::{LoadReport, Loader};
use crate::domain::project::LoadConfig;
use crate::domain::transform::{TransformReport, Transformer};
use crate::error::{SalesmartError, Stage, StageContext};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::connector::Connector;
use crate::ports::extractor::Extractor;

pub const RUN_RESULTS_FILE: &str = "run_results.json";

/// Everything a successful run reports, also written to `run_results.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub source: String,
    pub engine: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub transform: TransformReport,
    pub load: LoadReport,
}

/// Extract, transform and load, strictly in that order.
#[instrument(skip_all, fields(source = %extractor.source_name(), engine = connector.engine_name()))]
pub async fn run_pipeline(
    extractor: &dyn Extractor,
    connector: &dyn Connector,
    config: &LoadConfig,
) -> Result<RunResult, SalesmartError> {
    let started_at = Utc::now();
    let clock = Instant::now();

    let raw = extractor.extract().await.stage(Stage::Extract)?;
    let (clean, transform) = Transformer::transform(raw).stage(Stage::Transform)?;
    let load = Loader::new(*config).load(connector, clean).await?;

    let elapsed_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(elapsed_ms, "Pipeline finished");

    Ok(RunResult {
        source: extractor.source_name(),
        engine: connector.engine_name().to_string(),
        started_at,
        elapsed_ms,
        transform,
        load,
    })
}

/// Writes `run_results.json` under `target_dir`, creating the directory if needed.
pub fn save_run_results(result: &RunResult, target_dir: &Path) -> Result<PathBuf, SalesmartError> {
    fs::create_dir_all(target_dir)?;
    let path = target_dir.join(RUN_RESULTS_FILE);
    let json = serde_json::to_string_pretty(result).map_err(InfrastructureError::Json)?;
    atomic_write(&path, json)?;
    Ok(path)
}
