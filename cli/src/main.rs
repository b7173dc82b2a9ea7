use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use profile_cli::config::Config;
use profile_cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.apply_overrides(Config::load(&cli.config)?);

    // An explicit --log-level wins over RUST_LOG, which wins over the config file.
    let filter = match &cli.log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(api_url = %config.api.url, token_file = %config.storage.token_file.display(), "starting");

    let mut session = profile_cli::session(&config);
    profile_cli::run(&mut session, &cli.command)
}
