// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::integrity::DEFAULT_SAMPLE_SIZE;

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    pub version: String,

    /// Profile looked up in `connections.yml`.
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(rename = "config-paths", default = "default_config_paths")]
    pub config_paths: Vec<String>,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub load: LoadConfig,
}

/// Batching and reporting knobs of the load stage.
/// Connectivity and volume only, never cleaning semantics.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Validate)]
pub struct LoadConfig {
    #[validate(range(min = 1, max = 10000, message = "chunk-size must be within 1..=10000"))]
    #[serde(rename = "chunk-size", default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(rename = "sample-size", default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            sample_size: default_sample_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    500
}
fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}
fn default_config_paths() -> Vec<String> {
    vec!["config".to_string()]
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_profile() -> String {
    "default".to_string()
}
