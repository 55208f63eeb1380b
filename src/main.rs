use clap::Parser;
use colored::*;
use ltrmeta::cli::{load_effective_config, Cli, Commands};
use ltrmeta::LtrMetaError;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // LTRMETA_LOG wins over RUST_LOG; -v raises the default level
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("LTRMETA_LOG")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<LtrMetaError>() {
            Some(LtrMetaError::Config(_)) => 2,
            Some(LtrMetaError::Io(_)) => 3,
            Some(LtrMetaError::Parse(_)) | Some(LtrMetaError::Csv(_)) => 4,
            Some(LtrMetaError::DataConsistency(_)) => 5,
            Some(LtrMetaError::Predictor(_)) => 6,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_effective_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Summarize(args) => ltrmeta::cli::commands::summarize::run(args, config),
        Commands::Predict(args) => ltrmeta::cli::commands::predict::run(args, config),
        Commands::Export(args) => ltrmeta::cli::commands::export::run(args, config),
        Commands::Stats(args) => ltrmeta::cli::commands::stats::run(args, config),
        Commands::Config(args) => ltrmeta::cli::commands::config::run(args, config),
    }
}
