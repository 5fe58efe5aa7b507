//! Authorize command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("authorize")
        .about("Verify a bearer token and print the gateway policy")
        .arg(
            clap::Arg::new("token")
                .short('t')
                .long("token")
                .help("Bearer token, with or without the 'Bearer ' prefix")
                .value_name("TOKEN")
                .required(true),
        )
        .arg(
            clap::Arg::new("method-arn")
                .long("method-arn")
                .help("Method ARN the policy applies to")
                .value_name("ARN")
                .default_value("arn:aws:execute-api:*:*:*/*/*/*"),
        )
        .arg(
            clap::Arg::new("keys")
                .short('k')
                .long("keys")
                .help("Local JWKS file used instead of the user pool's key endpoint")
                .value_name("FILE"),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let token = matches
        .get_one::<String>("token")
        .map(String::as_str)
        .unwrap_or_default();
    let method_arn = matches
        .get_one::<String>("method-arn")
        .map(String::as_str)
        .unwrap_or_default();
    let keys = utils::path_arg(matches, "keys")?;

    let config = utils::load_config(matches)?;
    let app = utils::create_app(config);
    let authorizer = app.build_authorizer(keys.as_deref()).await?;

    let response = authorizer.authorize(token).await.into_response(method_arn);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
