use super::{ProvisionContext, Provisioner};
use crate::error::{HarborError, Result};
use crate::io;
use crate::settings::path_setting;
use std::path::Path;

pub const TEMPLATE_KEY: &str = "ansible_config_template_path";
pub const OUTPUT_KEY: &str = "ansible_config_path";

/// Renders the automation tool's config file from a template, using the whole
/// merged configuration as the template context.
pub struct ToolConfig;

impl Provisioner for ToolConfig {
    fn name(&self) -> &'static str {
        "tool-config"
    }

    fn provision(&self, ctx: &ProvisionContext<'_>) -> Result<()> {
        let (Some(template), Some(output)) = (
            path_setting(ctx.config, TEMPLATE_KEY),
            path_setting(ctx.config, OUTPUT_KEY),
        ) else {
            return Ok(());
        };
        let source = std::fs::read_to_string(&template)?;
        let rendered = render_template(&template, &source, ctx.config)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            io::ensure_dir(parent)?;
        }
        tracing::debug!(template = %template.display(), output = %output.display(), "rendering tool config");
        std::fs::write(&output, rendered.as_bytes())?;
        Ok(())
    }
}

pub fn render_template<S: serde::Serialize>(path: &Path, source: &str, context: S) -> Result<String> {
    let env = minijinja::Environment::new();
    env.render_str(source, context)
        .map_err(|e| HarborError::Template {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
