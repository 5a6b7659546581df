use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use inventory_cli::commands::{
    ConfigCommand, MetricsCommand, ResourcesCommand, StatusCommand, TypesCommand,
};
use inventory_cli::context::Context;
use inventory_cli::error::CliResult;
use inventory_cli::output::OutputFormat;
use inventory_console::config::ServerConfig;
use inventory_console::{Config, HttpInventoryClient};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inventory-cli")]
#[command(about = "Inventory CLI - Browse and administer an inventory service")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(
        long,
        short = 's',
        global = true,
        help = "Inventory base URL (e.g. http://localhost:8080/hawkular/inventory)"
    )]
    pub server: Option<String>,

    #[clap(long, short, global = true, help = "Log requests to stderr")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Resource tree commands")]
    Resources(ResourcesCommand),

    #[clap(about = "Resource type commands")]
    Types(TypesCommand),

    #[clap(about = "Metric graph commands")]
    Metrics(MetricsCommand),

    #[clap(about = "Show inventory service status")]
    Status(StatusCommand),

    #[clap(about = "Configuration commands")]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(server) = &cli.server {
        let timeout_secs = config.server.timeout_secs;
        config.server = ServerConfig {
            timeout_secs,
            ..ServerConfig::from_url(server)?
        };
    }

    if let Command::Config(cmd) = &cli.command {
        return cmd.execute(&config, cli.config.as_deref(), format).await;
    }

    let client = HttpInventoryClient::new(&config.server)?;
    let ctx = Context::new(Arc::new(client), config);

    match &cli.command {
        Command::Resources(cmd) => cmd.execute(&ctx, format).await,
        Command::Types(cmd) => cmd.execute(&ctx, format).await,
        Command::Metrics(cmd) => cmd.execute(&ctx, format).await,
        Command::Status(cmd) => cmd.execute(&ctx, format).await,
        Command::Config(_) => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,inventory_console=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
