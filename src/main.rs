//! apigw-gen CLI binary

use apigw_gen::cli::CliApp;

#[tokio::main]
async fn main() {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "apigw_gen=info,apigw_converter=info,apigw_authorizer=info".into()
            }),
        )
        .init();

    // Parse command line arguments
    let matches = CliApp::app().get_matches();

    // Run the CLI application
    if let Err(e) = CliApp::run(&matches).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
