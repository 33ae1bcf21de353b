//! Storefront CLI

use std::{
    error::Error as StdError,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront::{
    analytics::{AnalyticsError, count_by_status, load_orders, revenue_by_month},
    catalog::CatalogError,
    checkout::{CheckoutError, OrderRequest},
    config::{ConfigError, LogFormat, StorefrontConfig},
    context::StoreContext,
    products::ProductId,
    receipt::{self, ReceiptError},
};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart, wishlist and checkout", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the cart
    Cart(CartCommand),

    /// Manage the wishlist
    Wishlist(WishlistCommand),

    /// List catalog products
    Catalog,

    /// Summarise the cart as an order
    Checkout(CheckoutArgs),

    /// Aggregate orders by month and status
    Analytics(AnalyticsArgs),
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a catalog product to the cart
    Add { id: String },

    /// Remove a product from the cart
    Remove { id: String },

    /// Show the cart
    List,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// Save a catalog product
    Add { id: String },

    /// Remove a saved product
    Remove { id: String },

    /// Show the wishlist
    List,

    /// Remove every saved product
    Clear,

    /// Move a saved product into the cart
    Move { id: String },
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Quantity for a cart product, as ID=N (defaults to 1)
    #[arg(short, long = "quantity", value_parser = parse_quantity)]
    quantities: Vec<(ProductId, u32)>,

    /// Print the order payload as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Emit the order payload and empty the cart
    #[arg(long)]
    place_order: bool,
}

#[derive(Debug, Args)]
struct AnalyticsArgs {
    /// JSON file holding an array of orders
    orders: PathBuf,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to encode order")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.config);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the terminal, logs may be filtered out"
            )]
            {
                eprintln!("error: {}", report(&error));
            }

            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &StorefrontConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match config.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Cart(CartCommand { command }) => cart(&config, command, &mut out),
        Commands::Wishlist(WishlistCommand { command }) => wishlist(&config, command, &mut out),
        Commands::Catalog => {
            receipt::write_catalog(&mut out, &config.load_catalog()?)?;

            Ok(())
        }
        Commands::Checkout(args) => checkout(&config, args, &mut out),
        Commands::Analytics(args) => analytics(&config, &args, &mut out),
    }
}

fn cart(
    config: &StorefrontConfig,
    command: CartSubcommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut ctx = config.open_context()?;

    match command {
        CartSubcommand::Add { id } => {
            let item = config.load_catalog()?.cart_item(&id)?;

            if ctx.cart.add_to_cart(item) {
                writeln!(out, "Added {id} to the cart.")?;
            } else {
                writeln!(out, "{id} is already in the cart.")?;
            }
        }
        CartSubcommand::Remove { id } => {
            if ctx.cart.remove_from_cart(&id) {
                writeln!(out, "Removed {id} from the cart.")?;
            } else {
                writeln!(out, "{id} was not in the cart.")?;
            }
        }
        CartSubcommand::List => receipt::write_cart(out, &ctx.cart)?,
        CartSubcommand::Clear => {
            ctx.cart.clear();
            writeln!(out, "Cart emptied.")?;
        }
    }

    Ok(())
}

fn wishlist(
    config: &StorefrontConfig,
    command: WishlistSubcommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut ctx = config.open_context()?;

    match command {
        WishlistSubcommand::Add { id } => {
            let item = config.load_catalog()?.wishlist_item(&id)?;

            if ctx.wishlist.add_to_wishlist(item) {
                writeln!(out, "Saved {id} to the wishlist.")?;
            } else {
                writeln!(out, "{id} is already on the wishlist.")?;
            }
        }
        WishlistSubcommand::Remove { id } => {
            if ctx.wishlist.remove_from_wishlist(&id) {
                writeln!(out, "Removed {id} from the wishlist.")?;
            } else {
                writeln!(out, "{id} was not on the wishlist.")?;
            }
        }
        WishlistSubcommand::List => receipt::write_wishlist(out, &ctx.wishlist)?,
        WishlistSubcommand::Clear => {
            ctx.wishlist.clear();
            writeln!(out, "Wishlist emptied.")?;
        }
        WishlistSubcommand::Move { id } => move_to_cart(config, &mut ctx, &id, out)?,
    }

    Ok(())
}

fn move_to_cart(
    config: &StorefrontConfig,
    ctx: &mut StoreContext,
    id: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if !ctx.wishlist.is_in_wishlist(id) {
        writeln!(out, "{id} is not on the wishlist.")?;
        return Ok(());
    }

    let item = config.load_catalog()?.cart_item(id)?;

    if ctx.move_to_cart(item) {
        writeln!(out, "Moved {id} to the cart.")?;
    } else {
        writeln!(out, "{id} was already in the cart; removed it from the wishlist.")?;
    }

    Ok(())
}

fn checkout(
    config: &StorefrontConfig,
    args: CheckoutArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let rates = config.checkout_rates()?;
    let mut ctx = config.open_context()?;

    let quantities: FxHashMap<ProductId, u32> = args.quantities.into_iter().collect();
    let order = OrderRequest::from_cart(&ctx.cart, &quantities, &rates)?;

    if args.place_order && order.items.is_empty() {
        return Err(CheckoutError::EmptyCart.into());
    }

    if args.json || args.place_order {
        serde_json::to_writer_pretty(&mut *out, &order)?;
        writeln!(out)?;
    } else {
        receipt::write_order(&mut *out, &order, rates.currency())?;
    }

    if args.place_order {
        info!(total = order.total, lines = order.items.len(), "order placed");
        ctx.cart.clear();
    }

    Ok(())
}

fn analytics(
    config: &StorefrontConfig,
    args: &AnalyticsArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let rates = config.checkout_rates()?;
    let orders = load_orders(&args.orders)?;

    let months = revenue_by_month(&orders)?;
    let statuses = count_by_status(&orders);

    receipt::write_analytics(out, &months, &statuses, rates.currency())?;

    Ok(())
}

fn parse_quantity(s: &str) -> Result<(ProductId, u32), String> {
    let (id, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=N, got {s}"))?;

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid quantity {quantity:?}: {error}"))?;

    Ok((ProductId::new(id.trim()), quantity))
}

fn report(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
