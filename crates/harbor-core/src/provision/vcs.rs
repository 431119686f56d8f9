use super::{ProvisionContext, Provisioner};
use crate::error::Result;
use crate::value::lookup_str;

/// Sets the global git identity from `admin_email`, plus the git-review
/// username from `launchpad.user`.
pub struct VcsIdentity;

impl Provisioner for VcsIdentity {
    fn name(&self) -> &'static str {
        "vcs-identity"
    }

    fn provision(&self, ctx: &ProvisionContext<'_>) -> Result<()> {
        if let Some(email) = lookup_str(ctx.config, "admin_email") {
            let user = email.split('@').next().unwrap_or(email);
            set_global(ctx, "user.email", email)?;
            set_global(ctx, "user.name", user)?;
        }
        if let Some(user) = lookup_str(ctx.config, "launchpad.user") {
            set_global(ctx, "gitreview.username", user)?;
        }
        Ok(())
    }
}

fn set_global(ctx: &ProvisionContext<'_>, key: &str, value: &str) -> Result<()> {
    tracing::debug!(key, value, "setting global git config");
    let args = ["config", "--global", key, value].map(str::to_string);
    ctx.runner.run(&ctx.tools.git, &args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetcherRegistry;
    use crate::provision::testing::ctx;
    use crate::tool_runner::fake::RecordingRunner;
    use crate::{HarborError, Mapping};
    use serde_json::json;

    #[test]
    fn sets_email_name_and_review_user() {
        let config = json!({"admin_email": "ops-team@example.com", "launchpad": {"user": "opsbot"}});
        let config = config.as_object().cloned().unwrap();
        let (secrets, runner, fetchers) = (Mapping::new(), RecordingRunner::default(), FetcherRegistry::new());
        VcsIdentity
            .provision(&ctx(&config, &secrets, &runner, &fetchers))
            .unwrap();
        let args: Vec<Vec<String>> = runner.calls().into_iter().map(|(_, a)| a).collect();
        assert_eq!(
            args,
            vec![
                vec!["config", "--global", "user.email", "ops-team@example.com"],
                vec!["config", "--global", "user.name", "ops-team"],
                vec!["config", "--global", "gitreview.username", "opsbot"],
            ]
        );
    }

    #[test]
    fn nothing_configured_runs_nothing() {
        let config = Mapping::new();
        let (secrets, runner, fetchers) = (Mapping::new(), RecordingRunner::default(), FetcherRegistry::new());
        VcsIdentity
            .provision(&ctx(&config, &secrets, &runner, &fetchers))
            .unwrap();
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn git_failure_is_fatal() {
        let config = json!({"admin_email": "a@b.c"});
        let config = config.as_object().cloned().unwrap();
        let (secrets, runner, fetchers) = (Mapping::new(), RecordingRunner::default().fail("git"), FetcherRegistry::new());
        let result = VcsIdentity.provision(&ctx(&config, &secrets, &runner, &fetchers));
        assert!(matches!(result, Err(HarborError::ToolFailed { .. })));
        assert_eq!(runner.calls().len(), 1);
    }
}
