//! BlogSquad CLI: research, draft, and polish a blog post from a topic.
//!
//! Searches the web, has a language model summarize the findings, drafts a
//! post, grades it, and revises it once if it falls short.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    commands::load_dotenv(dotenvy::dotenv())?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
