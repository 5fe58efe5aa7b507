//! CLI command implementations

use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("apigw-gen")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Convert OpenAPI documents into API Gateway specifications")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(commands::queue::command())
            .subcommand(commands::microservice::command())
            .subcommand(commands::profiles::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::init::command())
            .subcommand(commands::authorize::command())
            .subcommand(commands::info::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("queue", sub_matches)) => commands::queue::run(sub_matches).await,
            Some(("microservice", sub_matches)) => commands::microservice::run(sub_matches).await,
            Some(("profiles", sub_matches)) => commands::profiles::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("authorize", sub_matches)) => commands::authorize::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            Some((name, _)) => Err(anyhow!("Unknown command: {name}")),
            None => Err(anyhow!("No command given")),
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use tracing::debug;

    /// The `-c/--config` argument shared by every command reading the registry
    pub fn config_arg() -> clap::Arg {
        clap::Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    /// An optional path argument with `~` and `$VAR` expanded
    pub fn path_arg(matches: &clap::ArgMatches, id: &str) -> Result<Option<PathBuf>> {
        matches
            .get_one::<String>(id)
            .map(|path| crate::utils::expand_path(path))
            .transpose()
    }

    /// Get configuration file path from arguments or the default locations
    pub fn get_config_path(matches: &clap::ArgMatches) -> Result<Option<PathBuf>> {
        let explicit = path_arg(matches, "config")?;
        let user_dir = crate::utils::get_config_dir().ok();
        Ok(crate::Config::discover(
            explicit.as_deref(),
            Path::new("."),
            user_dir.as_deref(),
        ))
    }

    /// Load configuration, falling back to the built-in registry
    pub fn load_config(matches: &clap::ArgMatches) -> Result<crate::Config> {
        match get_config_path(matches)? {
            Some(path) => {
                debug!("Loading configuration from {:?}", path);
                crate::Config::from_file(&path)
            }
            None => {
                debug!("No configuration file found, using built-in registry");
                crate::Config::builtin()
            }
        }
    }

    /// Create ApiGatewayGen instance
    pub fn create_app(config: crate::Config) -> crate::ApiGatewayGen {
        crate::ApiGatewayGen::new(config)
    }
}
