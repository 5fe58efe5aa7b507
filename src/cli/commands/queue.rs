//! Queue command implementation

use super::convert;
use anyhow::Result;
use apigw_converter::TargetKind;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    convert::with_args(
        Command::new("queue")
            .visible_alias("sqs")
            .about("Route the case-event endpoint to an SQS queue"),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    convert::run(TargetKind::Queue, matches).await
}
