//! Snow Bridge CLI entry point.

use clap::Parser;

use snow_bridge::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => snow_bridge::cli::commands::serve::execute(args, cli.json).await,
        Commands::CheckConfig(args) => {
            snow_bridge::cli::commands::check_config::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        snow_bridge::cli::handle_error(err, cli.json);
    }
}
