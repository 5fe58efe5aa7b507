//! Info command implementation

use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("info").about("Show tool information").arg(
        clap::Arg::new("detailed")
            .short('d')
            .long("detailed")
            .help("Show detailed information")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    println!("apigw-gen - API Gateway specification generator");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    if detailed {
        println!("\nDetailed Information:");
        println!("  - SQS SendMessage integration for the case-event endpoint");
        println!("  - VPC link HTTP proxy integration for microservices");
        println!("  - Cognito user pool and API key security definitions");
        println!("  - Per-path timeout and security exclusions");
        println!("  - JSON or YAML artifacts with drift checking");
        println!("  - RS256 JWT authorizer with JWKS key resolution");
        println!(
            "  - Remote key fetching: {}",
            if cfg!(feature = "http") { "enabled" } else { "disabled" }
        );
    }

    Ok(())
}
