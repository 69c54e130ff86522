mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

// Re-export from lib for internal use
use heading_rewriter::{encoding, error, heading, rewriter, rules};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heading_rewriter=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            root,
            encoding,
            dry_run,
        } => {
            cli::apply(
                &root,
                cli.rules.as_deref(),
                cli.city.as_deref(),
                encoding,
                dry_run,
                &cli.format,
            )?;
        }
        Commands::Rules => {
            cli::list_rules(cli.rules.as_deref(), cli.city.as_deref(), &cli.format)?;
        }
    }

    Ok(())
}
