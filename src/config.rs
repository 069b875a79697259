use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::name::QualifiedName;
use crate::query::DEFAULT_LIMIT;

/// Namespace holding packaging metadata rather than declarations
pub const METADATA_NAMESPACE: &str = "META-INF";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SymdexConfig {
    /// Manifest used when `--model` is not given
    pub model: Option<String>,
    /// Result cap for queries without an explicit limit
    pub query_limit: usize,
    /// Namespaces skipped (with their subtrees) during refresh
    pub excluded_namespaces: Vec<String>,
    pub max_namespace_depth: usize,
}

impl Default for SymdexConfig {
    fn default() -> Self {
        Self {
            model: None,
            query_limit: DEFAULT_LIMIT,
            excluded_namespaces: vec![METADATA_NAMESPACE.to_string()],
            max_namespace_depth: 64,
        }
    }
}

impl SymdexConfig {
    pub fn excluded_namespaces(&self) -> crate::Result<Vec<QualifiedName>> {
        self.excluded_namespaces
            .iter()
            .map(|ns| QualifiedName::new(ns.as_str()))
            .collect()
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("symdex.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SymdexConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SymdexConfig = toml::from_str(&contents)?;
    config.excluded_namespaces()?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SymdexConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
