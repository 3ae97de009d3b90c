use clap::Parser;
use storefront_services::cli::{serve, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Users(args) => serve::run_users(args).await,
        Command::Products(args) => serve::run_products(args).await,
    }
}
