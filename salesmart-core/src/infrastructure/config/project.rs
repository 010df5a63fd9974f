// salesmart-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["salesmart.yaml", "salesmart_project.yaml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Discovery
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    // 2. Base YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig =
        serde_yaml::from_str(&content).map_err(|source| InfrastructureError::YamlError {
            path: config_path.display().to_string(),
            source,
        })?;

    // 3. Environment layering, e.g. SALESMART_TARGET_PATH=/tmp/build salesmart run
    apply_env_overrides(&mut config)?;

    // 4. Fail on bad values before anything touches a store
    config.validate()?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides(config: &mut ProjectConfig) -> Result<(), InfrastructureError> {
    if let Ok(val) = std::env::var("SALESMART_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Ok(val) = std::env::var("SALESMART_PROFILE") {
        info!(old = ?config.profile, new = ?val, "Overriding profile via ENV");
        config.profile = val;
    }
    if let Ok(val) = std::env::var("SALESMART_CHUNK_SIZE") {
        let chunk_size = val.trim().parse::<usize>().map_err(|_| {
            warn!(value = %val, "Unparseable chunk size in ENV");
            InfrastructureError::ConfigError(format!(
                "SALESMART_CHUNK_SIZE must be a positive integer, got '{}'",
                val
            ))
        })?;
        info!(old = config.load.chunk_size, new = chunk_size, "Overriding chunk size via ENV");
        config.load.chunk_size = chunk_size;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_load_alternate_file_name() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("salesmart_project.yaml"),
            "name: sales\nversion: '2'\nload:\n  chunk-size: 50\n",
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "sales");
        assert_eq!(config.load.chunk_size, 50);
        Ok(())
    }

    #[test]
    fn test_missing_manifest() -> Result<()> {
        let dir = tempdir()?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_invalid_values_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("salesmart.yaml"),
            "name: ''\nversion: '1'\n",
        )?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::InvalidConfig(_)));
        Ok(())
    }

    #[test]
    fn test_broken_yaml_names_the_file() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("salesmart.yaml"), "name: [unclosed\n")?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(err.to_string().contains("salesmart.yaml"));
        Ok(())
    }
}
