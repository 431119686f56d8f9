//! Environment fetchers: named plugins that enumerate deployment environments
//! whose topology files can be rendered into extra `known_hosts` entries.

use crate::error::{HarborError, Result};
use crate::resolve::yaml_files_in;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One discovered environment: its name and topology file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub topology: PathBuf,
}

pub trait EnvironmentFetcher {
    fn fetch(&self, env_dir: Option<&Path>) -> Result<Vec<Environment>>;
}

/// Treats each YAML file directly inside `env_dir` as one environment,
/// named after the file stem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryFetcher;

impl EnvironmentFetcher for DirectoryFetcher {
    fn fetch(&self, env_dir: Option<&Path>) -> Result<Vec<Environment>> {
        let Some(dir) = env_dir.filter(|d| d.is_dir()) else {
            return Ok(Vec::new());
        };
        Ok(yaml_files_in(dir)?
            .into_iter()
            .map(|topology| Environment {
                name: topology
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                topology,
            })
            .collect())
    }
}

/// Fetchers selectable from configuration by name (`plugins.env_fetcher`).
#[derive(Default)]
pub struct FetcherRegistry {
    fetchers: BTreeMap<String, Box<dyn EnvironmentFetcher>>,
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("directory", DirectoryFetcher);
        registry
    }

    pub fn register<F>(&mut self, name: &str, fetcher: F)
    where
        F: EnvironmentFetcher + 'static,
    {
        self.fetchers.insert(name.to_string(), Box::new(fetcher));
    }

    pub fn get(&self, name: &str) -> Result<&dyn EnvironmentFetcher> {
        self.fetchers
            .get(name)
            .map(|f| &**f)
            .ok_or_else(|| HarborError::UnknownFetcher {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.fetchers.keys().map(String::as_str).collect()
    }
}
