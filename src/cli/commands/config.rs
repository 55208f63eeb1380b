use crate::cli::output::success;
use crate::core::config::{default_config, save_config, Config};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a configuration file with default values
    Init {
        /// Destination file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

pub fn run(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(crate::LtrMetaError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            save_config(&path, &default_config())?;
            success(&format!("Wrote default configuration to {}", path.display()));
        }
        ConfigCommand::Show => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
