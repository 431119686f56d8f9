use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use harbor_cli::app;
use harbor_cli::cli::Cli;
use harbor_core::HarborError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = app::run(cli) {
        if let Some(HarborError::InvalidTimezone(name)) = e.downcast_ref::<HarborError>() {
            Cli::command()
                .error(
                    ErrorKind::ValueValidation,
                    format!("config is missing a valid timezone/tz (got '{name}')"),
                )
                .exit();
        }
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
