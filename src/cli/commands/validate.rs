//! Validate command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use apigw_converter::TargetKind;
use clap::{ArgMatches, Command};
use tracing::{error, info};

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate every profile in the configuration")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration");

    let config = utils::load_config(matches)?;
    let errors = config.validate_profiles();

    if !errors.is_empty() {
        for e in &errors {
            error!("{}", e);
        }
        return Err(anyhow!(
            "{} of {} profiles are invalid",
            errors.len(),
            config.profile_count()
        ));
    }

    println!("Configuration is valid!");
    println!("Version: {}", config.version);
    println!(
        "Queue profiles: {}",
        config.profile_names(TargetKind::Queue).join(", ")
    );
    println!(
        "Microservice profiles: {}",
        config.profile_names(TargetKind::Microservice).join(", ")
    );

    Ok(())
}
