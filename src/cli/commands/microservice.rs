//! Microservice command implementation

use super::convert;
use anyhow::Result;
use apigw_converter::TargetKind;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    convert::with_args(
        Command::new("microservice")
            .visible_alias("vpc-link")
            .about("Proxy every operation to backend microservices over a VPC link"),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    convert::run(TargetKind::Microservice, matches).await
}
