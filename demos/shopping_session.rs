//! Shopping Session Example
//!
//! This example walks through a shopping session against the bundled catalog.
//! Two products are saved to the wishlist, one of them is moved into the cart
//! alongside a charger, and the cart is summarised as an order at 8% tax with
//! flat shipping in the catalog's currency.
//!
//! Run with: `cargo run --example shopping_session`

use anyhow::{Result, anyhow};
use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::Money;

use storefront::{
    catalog::Catalog,
    checkout::{CheckoutRates, OrderRequest},
    context::StoreContext,
    products::ProductId,
    receipt,
};

/// Shopping Session Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let catalog = Catalog::from_path("fixtures/catalog.yml")?;

    let currency = catalog
        .currency()
        .ok_or(anyhow!("catalog has no products"))?;

    let mut ctx = StoreContext::in_memory();

    ctx.wishlist
        .add_to_wishlist(catalog.wishlist_item("laptop-x1")?);
    ctx.wishlist
        .add_to_wishlist(catalog.wishlist_item("headphones-wh")?);

    ctx.move_to_cart(catalog.cart_item("headphones-wh")?);
    ctx.cart.add_to_cart(catalog.cart_item("charger-65w")?);

    let shipping = Money::from_minor(4_999, currency);
    let rates = CheckoutRates::new(Percentage::from(0.08), shipping);

    let quantities: FxHashMap<ProductId, u32> =
        [(ProductId::new("charger-65w"), 2)].into_iter().collect();

    let order = OrderRequest::from_cart(&ctx.cart, &quantities, &rates)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    println!("Wishlist:");
    receipt::write_wishlist(&mut handle, &ctx.wishlist)?;

    println!("\nOrder:");
    receipt::write_order(&mut handle, &order, currency)?;

    Ok(())
}
