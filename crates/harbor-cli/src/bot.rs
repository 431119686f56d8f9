//! The in-process bot runtime started by `harbor`.

use harbor_core::lifecycle::{Bot, Intent, SharedIntent};
use harbor_core::timezone::{now_in, Tz};
use harbor_core::{Mapping, Result};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Holds the merged configuration and secrets and idles until a signal asks
/// it to restart or stop.
pub struct StandbyBot<'a> {
    config: &'a Mapping,
    secrets: &'a Mapping,
    intent: SharedIntent,
    tz: Tz,
}

impl<'a> StandbyBot<'a> {
    pub fn new(config: &'a Mapping, secrets: &'a Mapping, intent: SharedIntent, tz: Tz) -> Self {
        Self {
            config,
            secrets,
            intent,
            tz,
        }
    }
}

impl Bot for StandbyBot<'_> {
    fn run(&mut self) -> Result<bool> {
        tracing::info!(
            local_time = %now_in(self.tz).format("%Y-%m-%d %H:%M:%S %Z"),
            config_keys = self.config.len(),
            secret_keys = self.secrets.len(),
            "bot online"
        );
        let intent = self.intent.wait(POLL_INTERVAL);
        Ok(intent == Intent::Restart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harbor_core::lifecycle::Lifecycle;

    #[test]
    fn restart_then_terminate() {
        let lifecycle = Lifecycle::new();
        let (config, secrets) = (Mapping::new(), Mapping::new());
        let mut bot = StandbyBot::new(&config, &secrets, lifecycle.intent(), Tz::UTC);

        let intent = lifecycle.intent();
        intent.set(Intent::Restart);
        assert!(bot.run().unwrap());
        intent.set(Intent::Terminate);
        assert!(!bot.run().unwrap());
    }
}
