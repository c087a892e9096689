//! bgpbot CLI binary.
//!
//! - `bgpbot run` connects to Discord and answers commands
//! - `bgpbot query "%route 1.1.1.1"` resolves one command from the shell

use bgpbot::{BotConfig, init_tracing};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_query};
    #[cfg(feature = "discord")]
    use cli::run_bot;

    // Credentials may come from a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs)?;

    let config = BotConfig::load(cli.config.as_deref())?;

    match cli.command {
        #[cfg(feature = "discord")]
        Commands::Run => {
            run_bot(&config).await?;
        }

        Commands::Query { line } => {
            run_query(&config, &line).await?;
        }
    }

    Ok(())
}
