use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

/// Shop administration from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, global = true, default_value = "http://localhost:3001")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Bearer token sent with every request
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value_t = Level::WARN)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List customers
    Customers(ListArgs),

    /// List shops
    Shops(ListArgs),

    /// List products
    Products(ListArgs),

    /// List invoices
    Invoices(ListArgs),

    /// List the customers of one shop
    AdminCustomers {
        /// Shop to list customers for
        #[arg(long)]
        shop_id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// List the products of one shop
    AdminProducts {
        /// Shop to list products for
        #[arg(long)]
        shop_id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Register a customer
    AddCustomer {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,
    },

    /// Register a shop and its administrator
    AddShop {
        #[arg(long)]
        shop_name: String,

        #[arg(long)]
        shop_type: String,

        #[arg(long)]
        admin_name: String,

        #[arg(long)]
        admin_email: String,

        #[arg(long)]
        package_type: String,
    },

    /// Add a product to the catalogue
    AddProduct(ProductArgs),

    /// Log in as a shop administrator and print the session token
    Login {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Print the totals of an invoice draft (JSON file)
    InvoiceTotal {
        /// Invoice draft file
        file: PathBuf,
    },

    /// Submit an invoice draft (JSON file)
    SubmitInvoice {
        /// Invoice draft file
        file: PathBuf,
    },

    /// Print the totals of a quotation (JSON file)
    QuotationTotal {
        /// Quotation file
        file: PathBuf,

        /// Tax rate applied to the subtotal (0.10 = 10%) [default: 0.10]
        #[arg(long)]
        tax_rate: Option<f64>,
    },

    /// Convert a quantity with a unit conversion factor
    Convert {
        quantity: f64,

        /// Target units per base unit
        factor: f64,
    },
}

/// Search, filter, sort and paging options shared by list commands.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Case-insensitive search text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Exact-match filter as field=value (repeatable)
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: NonZeroUsize,

    /// Rows per page [default: 5]
    #[arg(long)]
    pub page_size: Option<NonZeroUsize>,

    /// Read records from a JSON file instead of the backend
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value_t = 0.0)]
    pub price: f64,

    #[arg(long, default_value_t = 0.0)]
    pub quantity: f64,

    #[arg(long, default_value_t = 0)]
    pub stock: i64,

    #[arg(long, default_value = "")]
    pub category: String,

    #[arg(long, default_value = "")]
    pub keywords: String,

    #[arg(long, default_value = "")]
    pub shop_id: String,

    #[arg(long, default_value = "")]
    pub unit_id: String,

    /// Unit the quantity is entered in
    #[arg(long, default_value = "")]
    pub base_unit: String,

    /// Unit the quantity is stored in
    #[arg(long, default_value = "")]
    pub target_unit: String,

    /// Target units per base unit
    #[arg(long, default_value_t = 1.0)]
    pub conversion_factor: f64,
}

fn parse_filter(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected field=value, got '{}'", input)),
    }
}
