use super::{ProvisionContext, Provisioner};
use crate::error::Result;
use crate::settings::{section, FileMaterial, SslSettings};

/// Writes TLS certificate and key material to their configured paths.
pub struct Certificates;

impl Provisioner for Certificates {
    fn name(&self) -> &'static str {
        "certificates"
    }

    fn provision(&self, ctx: &ProvisionContext<'_>) -> Result<()> {
        let ssl: SslSettings = section(ctx.config, "ssl")?;
        for item in [ssl.cert, ssl.private_key].into_iter().flatten() {
            let FileMaterial {
                path: Some(path),
                contents: Some(contents),
            } = item
            else {
                continue;
            };
            if path.as_os_str().is_empty() || contents.is_empty() {
                continue;
            }
            tracing::debug!(path = %path.display(), "writing tls material");
            std::fs::write(&path, contents.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetcherRegistry;
    use crate::provision::testing::ctx;
    use crate::tool_runner::fake::RecordingRunner;
    use crate::Mapping;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn writes_items_with_path_and_contents() {
        let dir = TempDir::new().unwrap();
        let cert = dir.path().join("hook.crt");
        let key = dir.path().join("hook.pem");
        let config = json!({"ssl": {
            "cert": {"path": cert, "contents": "CERT"},
            "private_key": {"path": key}
        }});
        let config = config.as_object().cloned().unwrap();
        let (secrets, runner, fetchers) = (Mapping::new(), RecordingRunner::default(), FetcherRegistry::new());
        Certificates
            .provision(&ctx(&config, &secrets, &runner, &fetchers))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&cert).unwrap(), "CERT");
        assert!(!key.exists());
    }
}
