//! Typed views over the merged configuration used by the provisioners.
//!
//! Every field is optional: a provisioner whose inputs are absent does nothing.

use crate::error::Result;
use crate::value::{lookup, lookup_str, Mapping};
use serde::Deserialize;
use std::path::PathBuf;

pub const WORKING_DIR_KEYS: [&str; 2] = ["working_dir", "persistent_working_dir"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SshSettings {
    #[serde(default)]
    pub create_at: Option<PathBuf>,
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub known_hosts: Vec<String>,
}

impl SshSettings {
    /// Read `ssh.*` from config. Key material missing from config is taken
    /// from the same path in secrets.
    pub fn from_layers(config: &Mapping, secrets: &Mapping) -> Result<Self> {
        let mut settings: SshSettings = section(config, "ssh")?;
        for (slot, key) in [
            (&mut settings.config, "ssh.config"),
            (&mut settings.private_key, "ssh.private_key"),
            (&mut settings.public_key, "ssh.public_key"),
        ] {
            if slot.as_deref().map_or(true, str::is_empty) {
                *slot = lookup_str(secrets, key).map(str::to_string);
            }
        }
        Ok(settings)
    }
}

/// A target path plus literal file contents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileMaterial {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub contents: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SslSettings {
    #[serde(default)]
    pub cert: Option<FileMaterial>,
    #[serde(default)]
    pub private_key: Option<FileMaterial>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PluginSettings {
    #[serde(default)]
    pub env_fetcher: Option<String>,
}

/// Deserialize the mapping at `key`, or the default when it is absent.
pub fn section<T>(config: &Mapping, key: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match lookup(config, key) {
        Some(value) => Ok(T::deserialize(value)?),
        None => Ok(T::default()),
    }
}

pub fn path_setting(config: &Mapping, key: &str) -> Option<PathBuf> {
    lookup_str(config, key).map(PathBuf::from)
}
