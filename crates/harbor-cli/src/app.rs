use crate::bot::StandbyBot;
use crate::cli::Cli;
use crate::logging;
use anyhow::Context;
use harbor_core::config::{load_layered, Layer};
use harbor_core::fetcher::FetcherRegistry;
use harbor_core::lifecycle::{wire_signals, Lifecycle};
use harbor_core::loader::{CommandDecoder, SourceLoader};
use harbor_core::provision::{run_bootstrap, ProvisionContext, ToolPaths};
use harbor_core::resolve::SourceId;
use harbor_core::timezone::apply_timezone;
use harbor_core::tool_runner::SystemRunner;
use harbor_core::value::mask_passwords;
use harbor_core::Mapping;

/// Load, provision and (unless `--just-bootstrap`) supervise the bot.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let runner = SystemRunner;
    let decoder = CommandDecoder::new(&cli.decoder, &runner);
    let loader = SourceLoader::new(&decoder);

    let mut config = load_layered(&cli.config, Layer::Config, &loader, progress(Layer::Config))
        .context("failed to load configuration")?;
    eprintln!(
        "Configuration: {}",
        serde_json::to_string_pretty(&mask_passwords(&config))?
    );
    let secrets = load_layered(&cli.secrets, Layer::Secrets, &loader, progress(Layer::Secrets))
        .context("failed to load secrets")?;

    let tz = apply_timezone(&mut config)?;

    eprintln!("Switching to configured (or default) logging");
    logging::init(&config);
    tracing::info!(tz = %tz.name(), "configuration loaded");

    let fetchers = FetcherRegistry::with_defaults();
    let ctx = ProvisionContext {
        config: &config,
        secrets: &secrets,
        runner: &runner,
        fetchers: &fetchers,
        tools: ToolPaths::discover(),
    };
    run_bootstrap(&ctx).context("bootstrap failed")?;
    if cli.just_bootstrap {
        tracing::info!("bootstrap complete");
        return Ok(());
    }

    run_bot(&config, &secrets, tz)
}

fn run_bot(config: &Mapping, secrets: &Mapping, tz: harbor_core::timezone::Tz) -> anyhow::Result<()> {
    let lifecycle = Lifecycle::new();
    let _signals = wire_signals(lifecycle.intent()).context("failed to install signal handlers")?;
    let mut bot = StandbyBot::new(config, secrets, lifecycle.intent(), tz);
    match lifecycle.supervise(&mut bot) {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "bot failed");
            Err(e).context("bot run failed")
        }
    }
}

fn progress(layer: Layer) -> impl FnMut(usize, &SourceId) {
    move |i, id| {
        if i == 0 {
            eprintln!("Loading {} from '{id}'", layer.noun());
        } else {
            eprintln!("Loading + merging {} from '{id}'", layer.noun());
        }
    }
}
