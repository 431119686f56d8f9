//! SSH client material: config, key pair and a generated `known_hosts`.

use super::{ProvisionContext, Provisioner};
use crate::error::Result;
use crate::fetcher::Environment;
use crate::io;
use crate::settings::{path_setting, section, PluginSettings, SshSettings};
use std::path::{Path, PathBuf};
use url::{Host, Url};

pub const KNOWN_HOSTS_HEADER: &str =
    "# WARNING: DO NOT EDIT THIS FILE (IT WAS AUTOGENERATED ON BOT BOOTSTRAP!!!)";

const PRIVATE_MODE: u32 = 0o600;
const KNOWN_HOSTS_MODE: u32 = 0o644;

pub struct SshMaterials;

impl Provisioner for SshMaterials {
    fn name(&self) -> &'static str {
        "ssh"
    }

    fn provision(&self, ctx: &ProvisionContext<'_>) -> Result<()> {
        let ssh = SshSettings::from_layers(ctx.config, ctx.secrets)?;
        let Some(create_at) = ssh.create_at.filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };
        io::ensure_dir(&create_at)?;

        for (name, contents) in [
            ("config", &ssh.config),
            ("id_rsa", &ssh.private_key),
            ("id_rsa.pub", &ssh.public_key),
        ] {
            if let Some(contents) = contents.as_deref().filter(|c| !c.is_empty()) {
                let path = create_at.join(name);
                tracing::debug!(path = %path.display(), "writing ssh material");
                io::write_with_mode(&path, contents.as_bytes(), PRIVATE_MODE)?;
            }
        }

        let mut lines = Vec::new();
        for host in &ssh.known_hosts {
            lines.extend(scan_host(ctx, host)?);
        }
        lines.extend(environment_hosts(ctx)?);

        if lines.is_empty() {
            tracing::debug!("no known hosts collected");
            return Ok(());
        }
        let path = create_at.join("known_hosts");
        tracing::info!(path = %path.display(), lines = lines.len(), "writing known_hosts");
        io::write_with_mode(&path, render_known_hosts(&lines).as_bytes(), KNOWN_HOSTS_MODE)
    }
}

/// Split a host specifier into `(hostname, port)` by parsing it as the
/// authority of an `https://` URL, which handles IPv4, bracketed IPv6 and an
/// optional `:port`.
pub fn parse_host(spec: &str) -> Option<(String, Option<u16>)> {
    let url = Url::parse(&format!("https://{spec}")).ok()?;
    let host = match url.host()? {
        Host::Domain(d) => d.to_string(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    };
    let port = url
        .port()
        .or_else(|| explicit_port(spec).and(url.port_or_known_default()));
    Some((host, port))
}

/// The `:<digits>` suffix of the authority, if the specifier spells one out.
/// `Url::port` hides a port equal to the scheme default, so `:443` is only
/// recoverable from the raw text.
fn explicit_port(spec: &str) -> Option<&str> {
    let authority = spec.trim().split(['/', '?', '#']).next()?;
    let after_host = match authority.rfind(']') {
        Some(end) => &authority[end + 1..],
        None => authority,
    };
    let (_, digits) = after_host.rsplit_once(':')?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

fn scan_host(ctx: &ProvisionContext<'_>, spec: &str) -> Result<Vec<String>> {
    let (hostname, port) =
        parse_host(spec).unwrap_or_else(|| (spec.trim().to_string(), None));
    let mut args = Vec::new();
    if let Some(port) = port {
        args.push("-p".to_string());
        args.push(port.to_string());
    }
    args.push(hostname);
    tracing::debug!(host = spec, "scanning host keys");
    let output = ctx.runner.run(&ctx.tools.keyscan, &args)?;

    let mut lines = vec![format!("# Keyscan for '{spec}'")];
    lines.extend(clean_lines(&output.stdout_lossy()));
    Ok(lines)
}

fn environment_hosts(ctx: &ProvisionContext<'_>) -> Result<Vec<String>> {
    let plugins: PluginSettings = section(ctx.config, "plugins")?;
    let Some(name) = plugins.env_fetcher.filter(|n| !n.is_empty()) else {
        return Ok(Vec::new());
    };
    let fetcher = ctx.fetchers.get(&name)?;
    let Some(render) = ctx.tools.render.as_deref() else {
        tracing::debug!(fetcher = %name, "render not installed; skipping environments");
        return Ok(Vec::new());
    };

    let env_dir: Option<PathBuf> = path_setting(ctx.config, "env_dir");
    let mut lines = Vec::new();
    for Environment { name, topology } in fetcher.fetch(env_dir.as_deref())? {
        lines.extend(render_environment(ctx, render, &name, &topology)?);
    }
    Ok(lines)
}

fn render_environment(
    ctx: &ProvisionContext<'_>,
    render: &Path,
    name: &str,
    topology: &Path,
) -> Result<Vec<String>> {
    let args = vec![
        "-e".to_string(),
        topology.display().to_string(),
        "known_hosts".to_string(),
    ];
    let output = ctx.runner.run(render, &args)?;
    let mut lines = vec![format!("# Environment '{name}'")];
    lines.extend(clean_lines(&output.stdout_lossy()));
    Ok(lines)
}

/// Drop blank and comment lines from tool output.
pub fn clean_lines(blob: &str) -> impl Iterator<Item = String> + '_ {
    blob.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

pub fn render_known_hosts(lines: &[String]) -> String {
    let mut out = String::from(KNOWN_HOSTS_HEADER);
    out.push('\n');
    out.push_str(&lines.join("\n"));
    out.push('\n');
    out
}
