// salesmart-core/src/infrastructure/config/connection.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionProfile {
    pub target: String,
    pub outputs: HashMap<String, ConnectionOutput>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionOutput {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
}

/// Where the operational rows come from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Postgres {
        host: String,
        #[serde(default = "default_pg_port")]
        port: u16,
        user: String,
        #[serde(default)]
        password: String,
        database: String,
        #[serde(default = "default_pg_schema")]
        schema: String,
    },
    Duckdb {
        path: String,
    },
    Csv {
        dir: String,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Duckdb,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DestinationConfig {
    #[serde(default = "default_engine")]
    pub driver: Engine,
    pub database: String,
    /// Kept for warehouse drivers that need it; embedded engines ignore it.
    #[serde(default)]
    pub server: Option<String>,
}

fn default_pg_port() -> u16 {
    5432
}
fn default_pg_schema() -> String {
    "public".to_string()
}
fn default_engine() -> Engine {
    Engine::Duckdb
}

impl ConnectionProfile {
    /// Output named `output`, or the profile's default target.
    pub fn output(&self, output: Option<&str>) -> Result<&ConnectionOutput, InfrastructureError> {
        let name = output.unwrap_or(&self.target);
        self.outputs.get(name).ok_or_else(|| {
            let mut known: Vec<&String> = self.outputs.keys().collect();
            known.sort();
            InfrastructureError::ConfigError(format!(
                "Output '{}' not found. Available outputs: {:?}",
                name, known
            ))
        })
    }
}

#[instrument(skip(project_dir, config), fields(profile = %config.profile))]
pub fn load_connections(
    project_dir: &Path,
    config: &ProjectConfig,
) -> Result<HashMap<String, ConnectionProfile>, InfrastructureError> {
    let config_subpath = config
        .config_paths
        .first()
        .map(|s: &String| s.as_str())
        .unwrap_or("config");
    let config_dir = project_dir.join(config_subpath);

    // Support yml/yaml
    let paths = [
        config_dir.join("connections.yml"),
        config_dir.join("connections.yaml"),
    ];
    let connections_path = paths.iter().find(|p| p.exists()).ok_or_else(|| {
        InfrastructureError::ConfigNotFound(format!(
            "connections.yml or connections.yaml in {:?}",
            config_dir
        ))
    })?;
    info!(path = ?connections_path, "Loading connections");

    let content = fs::read_to_string(connections_path)?;
    let mut connections: HashMap<String, ConnectionProfile> =
        serde_yaml::from_str(&content).map_err(|source| InfrastructureError::YamlError {
            path: connections_path.display().to_string(),
            source,
        })?;

    apply_secret_overrides(&mut connections);
    Ok(connections)
}

/// Resolves the output used by a run: `profile` from the project config, then its target.
pub fn resolve_output(
    connections: &HashMap<String, ConnectionProfile>,
    profile: &str,
) -> Result<ConnectionOutput, InfrastructureError> {
    let connection = connections.get(profile).ok_or_else(|| {
        InfrastructureError::ConfigError(format!("Profile '{}' not found in connections", profile))
    })?;
    let output = connection.output(None)?;

    if let Some(server) = &output.destination.server {
        warn!(server = %server, driver = ?output.destination.driver, "Destination server ignored by embedded driver");
    }
    Ok(output.clone())
}

fn apply_secret_overrides(connections: &mut HashMap<String, ConnectionProfile>) {
    let Ok(secret) = std::env::var("SALESMART_SOURCE_PASSWORD") else {
        return;
    };
    info!("Overriding source password via ENV");
    for output in connections.values_mut().flat_map(|p| p.outputs.values_mut()) {
        if let SourceConfig::Postgres { password, .. } = &mut output.source {
            password.clone_from(&secret);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CONNECTIONS: &str = r#"
default:
  target: dev
  outputs:
    dev:
      source:
        type: postgres
        host: localhost
        user: etl
        password: secret
        database: sales
      destination:
        driver: duckdb
        database: target/warehouse.duckdb
        server: sqlsrv01
    local:
      source:
        type: csv
        dir: data
      destination:
        database: ":memory:"
"#;

    #[test]
    fn test_parse_profiles() {
        let connections: HashMap<String, ConnectionProfile> =
            serde_yaml::from_str(CONNECTIONS).unwrap();
        let profile = &connections["default"];

        let dev = profile.output(None).unwrap();
        assert_eq!(
            dev.source,
            SourceConfig::Postgres {
                host: "localhost".into(),
                port: 5432,
                user: "etl".into(),
                password: "secret".into(),
                database: "sales".into(),
                schema: "public".into(),
            }
        );
        assert_eq!(dev.destination.server.as_deref(), Some("sqlsrv01"));

        let local = profile.output(Some("local")).unwrap();
        assert_eq!(local.source, SourceConfig::Csv { dir: "data".into() });
        assert_eq!(local.destination.driver, Engine::Duckdb);
    }

    #[test]
    fn test_unknown_profile_and_output() {
        let connections: HashMap<String, ConnectionProfile> =
            serde_yaml::from_str(CONNECTIONS).unwrap();

        assert!(resolve_output(&connections, "prod").is_err());
        assert!(connections["default"].output(Some("qa")).is_err());
        assert!(resolve_output(&connections, "default").is_ok());
    }
}
