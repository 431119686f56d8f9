use clap::Parser;
use harbor_core::loader::DEFAULT_DECODER;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "harbor",
    about = "Bootstrap the chat-ops bot environment and keep the bot running",
    version
)]
pub struct Cli {
    /// Configuration file or directory of yaml files (`PATH[:LOOKUP_KEY]`),
    /// merged into the bot configuration in the order given
    #[arg(short = 'c', long = "config", value_name = "PATH", required = true)]
    pub config: Vec<String>,

    /// Secrets file or directory (`PATH[:LOOKUP_KEY]`), always decoded and
    /// never merged into the bot configuration
    #[arg(short = 's', long = "secrets", value_name = "PATH")]
    pub secrets: Vec<String>,

    /// Provision the environment and exit without running the bot
    #[arg(long)]
    pub just_bootstrap: bool,

    /// Program used to decode secrets and keyed sources
    #[arg(long, env = "HARBOR_DECODER", default_value = DEFAULT_DECODER, value_name = "PROGRAM")]
    pub decoder: PathBuf,
}
