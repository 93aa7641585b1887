mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod source;
mod utils;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use app::CommandContext;
use cli::Cli;
use config::Config;

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let cli = cli.with_config(&config);

    init_tracing(cli.debug);
    for error in &config.skipped {
        warn!(%error, "skipping config file");
    }
    if let Some(path) = &config.path {
        debug!(path = %path.display(), "loaded config");
    }

    let ctx = CommandContext {
        cli: &cli,
        config: &config,
    };
    if let Err(e) = app::run(&ctx) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
