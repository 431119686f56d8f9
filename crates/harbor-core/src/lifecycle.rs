//! Running the bot until a terminate signal arrives.
//!
//! OS signals only record an [`Intent`] in a shared [`IntentCell`]; the bot
//! polls the cell at its own safe points and returns from [`Bot::run`] with
//! `true` to be started again or `false` to shut down.
//!
//! | Signal           | Intent      |
//! |------------------|-------------|
//! | SIGINT, SIGTERM  | `Terminate` |
//! | SIGHUP (unix)    | `Restart`   |

use crate::error::Result;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

const NONE: u8 = 0;
const RESTART: u8 = 1;
const TERMINATE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Restart,
    Terminate,
}

impl Intent {
    fn encode(self) -> u8 {
        match self {
            Intent::Restart => RESTART,
            Intent::Terminate => TERMINATE,
        }
    }

    fn decode(raw: u8) -> Option<Self> {
        match raw {
            RESTART => Some(Intent::Restart),
            TERMINATE => Some(Intent::Terminate),
            _ => None,
        }
    }
}

/// Single-slot, lock-free intent holder. The latest `set` wins.
#[derive(Debug, Default)]
pub struct IntentCell {
    slot: AtomicU8,
}

impl IntentCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, intent: Intent) {
        self.slot.store(intent.encode(), Ordering::SeqCst);
    }

    /// Read and clear the slot.
    pub fn take(&self) -> Option<Intent> {
        Intent::decode(self.slot.swap(NONE, Ordering::SeqCst))
    }

    #[cfg(test)]
    pub(crate) fn peek(&self) -> Option<Intent> {
        Intent::decode(self.slot.load(Ordering::SeqCst))
    }

    /// Block until an intent is present, checking every `interval`, and take it.
    pub fn wait(&self, interval: Duration) -> Intent {
        loop {
            if let Some(intent) = self.take() {
                return intent;
            }
            std::thread::sleep(interval);
        }
    }
}

pub type SharedIntent = Arc<IntentCell>;

/// The long-running bot process driven by [`Lifecycle::supervise`].
pub trait Bot {
    /// Run until the bot yields. `Ok(true)` asks to be run again.
    fn run(&mut self) -> Result<bool>;
}

/// Owns the intent cell and drives the run/restart loop.
#[derive(Debug, Default)]
pub struct Lifecycle {
    intent: SharedIntent,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the intent cell, handed to the bot at construction time.
    pub fn intent(&self) -> SharedIntent {
        Arc::clone(&self.intent)
    }

    /// Call `bot.run()` until it returns `false`. Returns how many runs happened.
    pub fn supervise(&self, bot: &mut dyn Bot) -> Result<u64> {
        tracing::info!("starting bot");
        let mut runs = 0u64;
        loop {
            runs += 1;
            if bot.run()? {
                tracing::info!(runs, "restarting bot");
            } else {
                tracing::info!(runs, "bot stopped");
                return Ok(runs);
            }
        }
    }
}

/// Keeps the signal listener alive. Dropping it stops listening.
pub struct SignalWiring {
    _runtime: tokio::runtime::Runtime,
}

/// Route process signals into `intent` on a background thread.
pub fn wire_signals(intent: SharedIntent) -> Result<SignalWiring> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("harbor-signals")
        .enable_all()
        .build()?;
    {
        let _guard = runtime.enter();
        spawn_listener(&runtime, intent)?;
    }
    tracing::info!("signal handlers installed");
    Ok(SignalWiring { _runtime: runtime })
}

#[cfg(unix)]
fn spawn_listener(runtime: &tokio::runtime::Runtime, intent: SharedIntent) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;

    runtime.spawn(async move {
        loop {
            tokio::select! {
                Some(()) = terminate.recv() => {
                    tracing::info!("SIGTERM: signaling bot to die");
                    intent.set(Intent::Terminate);
                }
                Some(()) = interrupt.recv() => {
                    tracing::info!("SIGINT: signaling bot to die");
                    intent.set(Intent::Terminate);
                }
                Some(()) = hangup.recv() => {
                    tracing::info!("SIGHUP: signaling bot to restart");
                    intent.set(Intent::Restart);
                }
                else => break,
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn spawn_listener(runtime: &tokio::runtime::Runtime, intent: SharedIntent) -> Result<()> {
    runtime.spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c: signaling bot to die");
            intent.set(Intent::Terminate);
        }
    });
    Ok(())
}
