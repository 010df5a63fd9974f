// salesmart/src/commands/run.rs
//
// USE CASE: Run the full reload.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use salesmart_core::application::{FactLoad, run_pipeline, save_run_results};
use salesmart_core::infrastructure::adapters::{DuckDBConnector, DuckDBExtractor};
use salesmart_core::infrastructure::config::{
    DestinationConfig, Engine, load_connections, load_project_config, resolve_output,
};
use salesmart_core::ports::connector::Connector;
use salesmart_core::ports::extractor::Extractor;

use crate::summary;

pub async fn execute(project_dir: PathBuf, profile: Option<String>) -> anyhow::Result<()> {
    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let mut config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    if let Some(profile) = profile {
        config.profile = profile;
    }
    println!("   Project: {} (v{})", config.name, config.version);

    let connections = load_connections(&project_dir, &config)
        .with_context(|| format!("Failed to load connections from {:?}", project_dir))?;
    let output = resolve_output(&connections, &config.profile)
        .with_context(|| format!("Failed to resolve profile '{}'", config.profile))?;
    println!("   Profile: {}", config.profile);

    // B. Instantiate the adapters
    let extractor = DuckDBExtractor::from_config(&output.source, &project_dir)
        .context("Failed to configure the source")?;
    println!("   Source: {}", extractor.source_name());

    let connector = open_destination(&output.destination, &project_dir)?;

    // C. Run the Pipeline (Application Layer)
    println!("🚀 Running extract -> transform -> load...");
    match run_pipeline(&extractor, connector.as_ref(), &config.load).await {
        Ok(result) => {
            let target_dir = project_dir.join(&config.target_path);
            let results_path = save_run_results(&result, &target_dir)
                .with_context(|| format!("Failed to write run results to {:?}", target_dir))?;

            summary::print_run_summary(&result);
            println!("📝 Run results: {}", results_path.display());

            match result.load.fact_load {
                FactLoad::Loaded { rows } => {
                    println!("\n✨ SUCCESS! {} fact rows loaded in {} ms", rows, result.elapsed_ms)
                }
                FactLoad::NoValidRows => println!(
                    "\n⚠️  WARNING: no fact row passed referential integrity ({} excluded). \
                     Check the dimension keys upstream.",
                    result.load.integrity.excluded
                ),
            }
        }
        Err(e) => {
            match e.stage() {
                Some(stage) => eprintln!("\n💥 CRITICAL PIPELINE ERROR in stage '{}'", stage),
                None => eprintln!("\n💥 CRITICAL PIPELINE ERROR"),
            }
            eprintln!("   Cause: {}", e.root());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn open_destination(
    destination: &DestinationConfig,
    project_dir: &Path,
) -> anyhow::Result<Box<dyn Connector>> {
    match destination.driver {
        Engine::Duckdb => {
            let db_path = if destination.database == ":memory:" {
                destination.database.clone()
            } else {
                let path = project_dir.join(&destination.database);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {:?}", parent))?;
                }
                path.to_string_lossy().into_owned()
            };
            println!("   Destination: DuckDB 🦆 ({})", db_path);
            Ok(Box::new(DuckDBConnector::new(&db_path).with_context(|| {
                format!("Failed to initialize DuckDB at {}", db_path)
            })?))
        }
    }
}
