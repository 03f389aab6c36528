mod analyzer;
mod commands;
mod config;
mod models;

use clap::Parser;
use commands::AnalyzeCommand;
use config::Config;
use tracing_subscriber::EnvFilter;

/// Fetch a remote OpenAPI document and print a structured summary of it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL of the OpenAPI specification endpoint; prompted for when omitted
    url: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config_path = Config::default_path()?;
    let mut command = AnalyzeCommand::new(Config::load_from(&config_path)?, config_path);
    command.execute(cli.url)
}
