use super::{ProvisionContext, Provisioner};
use crate::error::Result;
use crate::io;
use crate::settings::{path_setting, WORKING_DIR_KEYS};

/// Creates the bot's working directories.
pub struct Directories;

impl Provisioner for Directories {
    fn name(&self) -> &'static str {
        "directories"
    }

    fn provision(&self, ctx: &ProvisionContext<'_>) -> Result<()> {
        for key in WORKING_DIR_KEYS {
            if let Some(path) = path_setting(ctx.config, key) {
                tracing::debug!(setting = key, path = %path.display(), "ensuring directory");
                io::ensure_dir(&path)?;
            }
        }
        Ok(())
    }
}
