//! Hrdesk CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hrdesk::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => hrdesk::cli::commands::init::execute(args, cli.json).await,
        Commands::Query(args) => hrdesk::cli::commands::query::execute(args, cli.json).await,
        Commands::Ingest(args) => hrdesk::cli::commands::ingest::execute(args, cli.json).await,
        Commands::Analytics(args) => {
            hrdesk::cli::commands::analytics::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        hrdesk::cli::handle_error(err, cli.json);
    }
}
