//! Quantum admin CLI - back office for the Quantum storefront.
//!
//! Commands:
//! - `quantum products` - List, search and count catalog products
//! - `quantum orders` - List, search, inspect and update orders
//! - `quantum quote` - Price a basket with the store's shipping and tax
//! - `quantum config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, OrdersArgs, ProductsArgs, QuoteArgs};

/// Quantum admin CLI - Manage the Quantum storefront catalog and orders
#[derive(Parser)]
#[command(name = "quantum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products(ProductsArgs),

    /// Manage orders
    Orders(OrdersArgs),

    /// Price items with the configured shipping and tax
    Quote(QuoteArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init(&ctx.config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_status() {
        let cli = Cli::parse_from([
            "quantum", "--json", "orders", "set-status", "o-1", "completed", "--yes",
        ]);
        assert!(cli.json);
        match cli.command {
            Commands::Orders(OrdersArgs {
                command: commands::OrdersCommand::SetStatus { id, status, yes },
            }) => {
                assert_eq!(id, "o-1");
                assert_eq!(status, "completed");
                assert!(yes);
            }
            _ => panic!("expected orders set-status"),
        }
    }

    #[test]
    fn test_parse_offline_quote() {
        let cli = Cli::parse_from(["quantum", "quote", "--offline", "29.99:2", "5:1"]);
        match cli.command {
            Commands::Quote(args) => {
                assert!(args.offline);
                assert_eq!(args.items, vec!["29.99:2", "5:1"]);
            }
            _ => panic!("expected quote"),
        }
    }
}
