//! Arguments and execution shared by the conversion commands

use crate::cli::utils;
use crate::ConvertOptions;
use anyhow::{anyhow, Result};
use apigw_converter::{OutputFormat, TargetKind};
use clap::{ArgMatches, Command};

/// Add the profile argument and common conversion flags to `command`
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            clap::Arg::new("profile")
                .help("Environment profile name (e.g. DEV, UAT, PROD, TF_VAR)")
                .value_name("PROFILE"),
        )
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("source")
                .short('s')
                .long("source")
                .help("Source OpenAPI document")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .help("Output directory")
                .value_name("DIR"),
        )
        .arg(
            clap::Arg::new("format")
                .long("format")
                .help("Output format")
                .value_parser(["json", "yaml"])
                .value_name("FORMAT"),
        )
        .arg(
            clap::Arg::new("check")
                .long("check")
                .help("Fail if the existing artifact differs instead of writing it")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(kind: TargetKind, matches: &ArgMatches) -> Result<()> {
    // Checked by hand so that a missing profile gets the usual one-line error
    let profile = matches
        .get_one::<String>("profile")
        .ok_or_else(|| anyhow!("Please provide an environment argument (e.g., DEV, UAT, PROD, TF_VAR)"))?;

    let options = ConvertOptions {
        source: utils::path_arg(matches, "source")?,
        output_dir: utils::path_arg(matches, "output-dir")?,
        format: matches
            .get_one::<String>("format")
            .map(|format| format.parse::<OutputFormat>())
            .transpose()
            .map_err(|e| anyhow!(e))?,
        check: matches.get_flag("check"),
    };

    let config = utils::load_config(matches)?;
    let app = utils::create_app(config);
    let outcome = app.convert(kind, profile, &options).await?;

    if !outcome.written {
        println!(
            "API Gateway specification {} is up to date",
            outcome.artifact.display()
        );
        return Ok(());
    }

    match kind {
        TargetKind::Queue => println!(
            "Generated SQS API Gateway specification written to {}",
            outcome.artifact.display()
        ),
        TargetKind::Microservice => println!(
            "Generated API Gateway specification written to {}",
            outcome.artifact.display()
        ),
    }

    Ok(())
}
