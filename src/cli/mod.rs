//! Command line entry points, one subcommand per service

pub mod serve;

use clap::{Args, Parser, Subcommand};

/// Storefront user-account and product catalog services
#[derive(Parser)]
#[command(name = "storefront-services")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the user-account service
    Users(ServeArgs),

    /// Run the product catalog service
    Products(ServeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Override the configured port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the configured bind address
    #[arg(long)]
    pub host: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["storefront-services", "users", "--port", "9000"]).unwrap();
        match cli.command {
            Command::Users(args) => assert_eq!(args.port, Some(9000)),
            Command::Products(_) => panic!("expected users"),
        }

        let cli = Cli::try_parse_from(["storefront-services", "products"]).unwrap();
        assert!(matches!(cli.command, Command::Products(ServeArgs { port: None, .. })));
    }
}
