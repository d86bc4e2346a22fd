use anyhow::{Context, Result};
use clap::Parser;
use pawnwire::cli::{build_subscriber, display_error, App, Cli, Commands, Config};
use tracing::info;

async fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(&cli.args).context("Invalid configuration")?;
    let _guard = tracing::subscriber::set_default(build_subscriber(config.debug));

    match cli.command() {
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
        Commands::Play => {
            let summary = App::new(config)
                .skip_welcome(cli.args.skip_welcome)
                .run()
                .await?;
            info!(outcome = %summary.outcome, moves = summary.moves.len(), "game finished");
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        display_error(&e);
        std::process::exit(1);
    }
}
