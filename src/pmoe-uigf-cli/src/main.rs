mod cli;
mod commands;
mod config;
mod dispatch;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::*;

const DEFAULT_FILTER: &str = "pmoe_uigf=info,pmoe_uigf_cli=info";
const VERBOSE_FILTER: &str = "pmoe_uigf=debug,pmoe_uigf_cli=debug";

fn init_tracing(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };

    // Logs go to stderr, stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(args) => commands::convert::handle(args)?,

        Commands::Override { command } => dispatch::dispatch_override(command)?,

        Commands::Validate { file, schema } => {
            commands::validate::handle(&file, schema.as_deref())?
        }

        Commands::Configure {
            export_app,
            export_app_version,
            override_file,
            dictionary_url,
            show,
        } => {
            commands::configure::handle(
                ConfigureUpdate {
                    export_app,
                    export_app_version,
                    override_file,
                    dictionary_url,
                },
                show,
            )?;
        }
    }

    Ok(())
}
