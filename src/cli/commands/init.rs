//! Init command implementation

use crate::{utils, Config};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("init")
        .about("Write the built-in profile registry to an editable file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(".apigw-gen.yaml"),
        )
        .arg(
            clap::Arg::new("force")
                .short('f')
                .long("force")
                .help("Overwrite an existing file")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = match matches.get_one::<String>("output") {
        Some(path) => utils::expand_path(path)?,
        None => PathBuf::from(".apigw-gen.yaml"),
    };

    if output_path.exists() && !matches.get_flag("force") {
        return Err(anyhow!(
            "{} already exists; use --force to overwrite",
            output_path.display()
        ));
    }

    info!("Initializing configuration file: {:?}", output_path);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        utils::ensure_directory(parent)?;
    }
    Config::builtin()?.save_to_file(&output_path)?;

    println!("Configuration file created: {}", output_path.display());
    Ok(())
}
