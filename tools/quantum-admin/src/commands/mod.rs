//! CLI command implementations.

pub mod config;
pub mod orders;
pub mod products;
pub mod quote;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products with their price range.
    List {
        /// Include unpublished and unavailable products.
        #[arg(short, long)]
        all: bool,
    },
    /// Catalog counts.
    Stats,
    /// Search products by name, description or tag.
    Search {
        /// Text to look for.
        query: String,
    },
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first. Archived orders are hidden.
    List {
        /// Only orders in this status (e.g. pending, on_hold).
        #[arg(short, long)]
        status: Option<String>,

        /// Include archived orders.
        #[arg(short, long)]
        all: bool,

        /// Show only the first N orders.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Order count, revenue and customers.
    Stats,
    /// Search orders by order id, customer id, name or email.
    Search {
        /// Text to look for.
        query: String,

        /// Only orders in this status.
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one order with its line items.
    Show {
        /// Order ID.
        id: String,
    },
    /// Change the status of an order.
    SetStatus {
        /// Order ID.
        id: String,

        /// New status (e.g. processing, completed, cancelled).
        status: String,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Items as VARIANT_ID:QTY, or PRICE:QTY with --offline.
    #[arg(required = true)]
    pub items: Vec<String>,

    /// Price the given unit prices locally instead of reading the catalog.
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Tenant the API calls are made for.
        #[arg(short, long, default_value = "")]
        tenant: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
