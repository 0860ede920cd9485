use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use postdeck::app::AppContext;
use postdeck::cli::{commands, Cli, Commands};
use postdeck::config::Config;

fn init_tracing(log: Option<&Path>) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    match log {
        Some(path) => {
            let file = File::create(path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            registry.with(fmt::layer().with_writer(std::io::stderr)).init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;

    let config = Config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(config, cli.db)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Sync => {
            commands::sync_items(&ctx).await?;
        }
        Commands::List { page } => {
            commands::list_items(&ctx, page)?;
        }
        Commands::Show { id } => {
            commands::show_item(&ctx, id).await?;
        }
        Commands::Tui => {
            postdeck::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}
