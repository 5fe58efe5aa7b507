//! Profiles command implementation

use crate::cli::utils;
use anyhow::Result;
use apigw_converter::TargetKind;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("profiles")
        .about("List environment profiles")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;

    for kind in [TargetKind::Queue, TargetKind::Microservice] {
        println!("{} profiles:", kind.label());
        for name in config.profile_names(kind) {
            let status = match kind {
                TargetKind::Queue => config.queue_profile(name).err(),
                TargetKind::Microservice => config.microservice_profile(name).err(),
            };
            match status {
                None => println!("  {name}"),
                Some(_) => println!("  {name} (invalid)"),
            }
        }
    }

    Ok(())
}
