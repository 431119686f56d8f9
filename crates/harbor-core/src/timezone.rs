//! Choosing the bot's timezone.
//!
//! Priority:
//! 1. `tz` in the merged configuration
//! 2. The host zone (`TZ`, `/etc/timezone`, the `/etc/localtime` symlink)
//! 3. [`DEFAULT_TZ`]

use crate::error::{HarborError, Result};
use crate::value::{lookup_str, Mapping};
use chrono::{DateTime, Utc};
pub use chrono_tz::Tz;
use serde_json::Value;
use std::path::Path;

pub const DEFAULT_TZ: &str = "UTC";

/// Resolve and validate the timezone, then record it at `config.tz`.
pub fn apply_timezone(config: &mut Mapping) -> Result<Tz> {
    apply_timezone_with(config, host_timezone)
}

/// Like [`apply_timezone`], with the host lookup supplied by the caller.
///
/// A configured `tz` must be valid. A host zone that does not parse is
/// ignored in favour of [`DEFAULT_TZ`].
pub fn apply_timezone_with<F>(config: &mut Mapping, host: F) -> Result<Tz>
where
    F: FnOnce() -> Option<String>,
{
    let tz = match lookup_str(config, "tz") {
        Some(name) => parse_timezone(name)?,
        None => host()
            .and_then(|name| match parse_timezone(&name) {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::debug!(host_tz = %name, "ignoring unrecognised host timezone");
                    None
                }
            })
            .map_or_else(|| parse_timezone(DEFAULT_TZ), Ok)?,
    };
    config.insert("tz".to_string(), Value::String(tz.name().to_string()));
    Ok(tz)
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| HarborError::InvalidTimezone(name.to_string()))
}

pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Best-effort detection of the host's configured zone name.
pub fn host_timezone() -> Option<String> {
    if let Some(tz) = std::env::var("TZ")
        .ok()
        .map(|v| v.trim_start_matches(':').trim().to_string())
        .filter(|v| !v.is_empty())
    {
        return Some(tz);
    }
    if let Some(tz) = std::fs::read_to_string("/etc/timezone")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        return Some(tz);
    }
    zone_from_localtime(Path::new("/etc/localtime"))
}

fn zone_from_localtime(link: &Path) -> Option<String> {
    let target = std::fs::read_link(link).ok()?;
    let target = target.to_string_lossy();
    let (_, zone) = target.split_once("zoneinfo/")?;
    Some(zone.to_string()).filter(|z| !z.is_empty())
}
