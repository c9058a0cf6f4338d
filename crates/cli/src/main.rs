//! Bazaar CLI - storefront API client and admin dashboard views.
//!
//! # Usage
//!
//! ```bash
//! # Store a bearer token
//! bazaar login --token eyJhbGciOi...
//!
//! # Show the signed-in profile
//! bazaar profile show
//!
//! # List payments as JSON
//! bazaar --json payments list
//!
//! # Dashboard headline metrics
//! bazaar admin summary
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` - Manage the stored bearer token
//! - `profile` - View and edit the signed-in profile
//! - `payments` - List, fetch and record payments
//! - `razorpay` - Create checkout orders
//! - `admin` - Read-only dashboard views

#![cfg_attr(not(test), forbid(unsafe_code))]

use bazaar_core::{CurrencyCode, OrderStatus};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

use commands::Output;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront and admin CLI")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a bearer token
    Login {
        /// Token issued by the backend's login endpoint
        #[arg(long)]
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// View and edit the signed-in profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Payment records
    Payments {
        #[command(subcommand)]
        action: PaymentsAction,
    },
    /// Razorpay orders
    Razorpay {
        #[command(subcommand)]
        action: RazorpayAction,
    },
    /// Admin dashboard views
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the profile and saved addresses
    Show,
    /// Change name, email or phone
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Make the address at INDEX the default one
    SetDefaultAddress {
        /// Position as listed by `profile show`
        index: usize,
    },
}

#[derive(Subcommand)]
enum PaymentsAction {
    /// List your payments
    List,
    /// Show one payment
    Get {
        id: String,
    },
    /// Record a payment
    Create {
        #[arg(long)]
        amount: Decimal,
        /// Payment method (`card`, `upi`, `netbanking`, ...)
        #[arg(long)]
        method: String,
        #[arg(long)]
        transaction_id: String,
        /// ISO 4217 code (`INR`, `USD`, `EUR`, `GBP`)
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
}

#[derive(Subcommand)]
enum RazorpayAction {
    /// Create an order for AMOUNT in standard currency units
    Order {
        #[arg(long)]
        amount: Decimal,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Headline metrics and recent orders
    Summary,
    /// Orders, optionally by status
    Orders {
        /// `pending`, `processing`, `shipped`, `delivered` or `cancelled`
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Customers, optionally filtered
    Customers {
        /// Case-insensitive match on name, email or location
        #[arg(long)]
        search: Option<String>,
    },
    /// Products running low on stock
    LowStock {
        #[arg(long, default_value_t = bazaar_admin::dashboard::DEFAULT_LOW_STOCK_THRESHOLD)]
        threshold: u32,
    },
    /// Monthly sales, categories and user growth
    Sales,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = Output { json: cli.json };

    match cli.command {
        Commands::Login { token } => commands::auth::login(&token).await?,
        Commands::Logout => commands::auth::logout().await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(output).await?,
            ProfileAction::Update { name, email, phone } => {
                commands::profile::update(name, email, phone).await?;
            }
            ProfileAction::SetDefaultAddress { index } => {
                commands::profile::set_default_address(index).await?;
            }
        },
        Commands::Payments { action } => match action {
            PaymentsAction::List => commands::payments::list(output).await?,
            PaymentsAction::Get { id } => commands::payments::get(&id, output).await?,
            PaymentsAction::Create {
                amount,
                method,
                transaction_id,
                currency,
            } => {
                commands::payments::create(amount, method, transaction_id, currency, output)
                    .await?;
            }
        },
        Commands::Razorpay { action } => match action {
            RazorpayAction::Order { amount } => commands::razorpay::order(amount, output).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Summary => commands::admin::summary(output)?,
            AdminAction::Orders { status } => commands::admin::orders(status, output)?,
            AdminAction::Customers { search } => {
                commands::admin::customers(search.as_deref(), output)?;
            }
            AdminAction::LowStock { threshold } => commands::admin::low_stock(threshold, output)?,
            AdminAction::Sales => commands::admin::sales(output)?,
        },
    }
    Ok(())
}
