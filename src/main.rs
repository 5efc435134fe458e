use clap::Parser;
use flow_block_config::cli::{self, Cli, Command};
use flow_block_config::infrastructure::logging;
use flow_block_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    match cli.command {
        Command::Blocks => cli::blocks::run(),
        Command::Suggest(args) => cli::suggest::run(&config, args).await,
        Command::Replay(args) => cli::replay::run(&config, args).await,
    }
}
