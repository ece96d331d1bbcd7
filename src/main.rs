use anyhow::Result;
use clap::Parser;
use notulen::{
    app,
    cli::{handle_keys_command, handle_meeting_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("Notulen {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Meeting(args)) => {
            handle_meeting_command(args).await?;
            return Ok(());
        }
        Some(CliCommand::Keys(args)) => {
            handle_keys_command(args)?;
            return Ok(());
        }
        None => {}
    }

    app::run_service().await
}
