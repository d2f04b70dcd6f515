//! cf-applications-exporter - Prometheus exporter for Cloud Foundry applications

use cf_applications_exporter::{Exporter, Result, cli::Cli, utils::logging::init_tracing};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config().await?;

    if cli.dump_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    init_tracing(&config.logging)?;
    Exporter::new(config)?.run().await
}
