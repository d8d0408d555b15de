use anyhow::Result;
use bitebuddy::config::Config;
use clap::{Parser, Subcommand};

/// bitebuddy - Recipe discovery and bookmarking
#[derive(Parser)]
#[command(name = "bitebuddy")]
#[command(about = "Discover recipes and keep the ones you like", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    bitebuddy::observability::init_observability(
        "bitebuddy",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => bitebuddy::cli::migrate(&config).await,
        Commands::Reset => bitebuddy::cli::reset(&config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    bitebuddy::cli::serve(config, host_override, port_override).await
}
