//! Environment provisioning run before the bot starts.
//!
//! Steps run strictly in [`default_steps`] order, each reading only the merged
//! config and secrets. A step whose inputs are absent is a no-op, every step
//! is safe to re-run, and the first failure aborts the whole sequence.

pub mod certs;
pub mod dirs;
pub mod ssh;
pub mod tool_config;
pub mod vcs;

use crate::error::Result;
use crate::fetcher::FetcherRegistry;
use crate::tool_runner::ToolRunner;
use crate::value::Mapping;
use std::path::PathBuf;

/// Everything a step may read. Nothing in here is mutated by steps.
pub struct ProvisionContext<'a> {
    pub config: &'a Mapping,
    pub secrets: &'a Mapping,
    pub runner: &'a dyn ToolRunner,
    pub fetchers: &'a FetcherRegistry,
    pub tools: ToolPaths,
}

/// Where the external tools used by provisioning live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub keyscan: PathBuf,
    pub git: PathBuf,
    /// `None` when no renderer is installed; environment lookups are skipped.
    pub render: Option<PathBuf>,
}

impl ToolPaths {
    pub fn discover() -> Self {
        Self {
            keyscan: PathBuf::from("ssh-keyscan"),
            git: PathBuf::from("git"),
            render: crate::tool_runner::find_executable("render"),
        }
    }
}

pub trait Provisioner {
    fn name(&self) -> &'static str;
    fn provision(&self, ctx: &ProvisionContext<'_>) -> Result<()>;
}

pub fn default_steps() -> Vec<Box<dyn Provisioner>> {
    vec![
        Box::new(dirs::Directories),
        Box::new(ssh::SshMaterials),
        Box::new(certs::Certificates),
        Box::new(tool_config::ToolConfig),
        Box::new(vcs::VcsIdentity),
    ]
}

/// Run every step in order, stopping at the first error.
pub fn run_bootstrap(ctx: &ProvisionContext<'_>) -> Result<()> {
    tracing::info!("starting bootstrap");
    for step in default_steps() {
        tracing::info!(step = step.name(), "running provisioner");
        step.provision(ctx)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::tool_runner::fake::RecordingRunner;

    pub fn tools() -> ToolPaths {
        ToolPaths {
            keyscan: PathBuf::from("ssh-keyscan"),
            git: PathBuf::from("git"),
            render: Some(PathBuf::from("render")),
        }
    }

    pub fn ctx<'a>(
        config: &'a Mapping,
        secrets: &'a Mapping,
        runner: &'a RecordingRunner,
        fetchers: &'a FetcherRegistry,
    ) -> ProvisionContext<'a> {
        ProvisionContext {
            config,
            secrets,
            runner,
            fetchers,
            tools: tools(),
        }
    }
}
