//! Receipt
//!
//! Table rendering of the cart, the wishlist, order summaries and order analytics.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    analytics::{MonthlyRevenue, OrderStatus},
    cart::Cart,
    catalog::Catalog,
    checkout::OrderRequest,
    pricing::{PriceError, currency, money_from_minor},
    products::ProductId,
    wishlist::Wishlist,
};

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write output")]
    Io(#[from] io::Error),

    /// An amount could not be turned into money.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// A line total does not fit in minor units.
    #[error("line total overflowed for product {0}")]
    Overflow(ProductId),
}

/// Write the cart contents, each price in the currency it was stored with.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing fails or a stored price is invalid.
pub fn write_cart(mut out: impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Brand", "Condition", "Price", "Stock"]);

    for (idx, item) in cart.items().iter().enumerate() {
        builder.push_record([
            format!("{}", idx + 1),
            format!("{} ({})", item.name, item.id),
            item.brand.clone(),
            item.condition.clone(),
            stored_price(item.price, &item.currency)?,
            item.stock.to_string(),
        ]);
    }

    write_table(&mut out, builder, 4)
}

/// Write the wishlist contents, each price in the currency it was stored with.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing fails or a stored price is invalid.
pub fn write_wishlist(mut out: impl io::Write, wishlist: &Wishlist) -> Result<(), ReceiptError> {
    if wishlist.is_empty() {
        writeln!(out, "Your wishlist is empty.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Type", "SKU", "Price", "Featured"]);

    for (idx, item) in wishlist.items().iter().enumerate() {
        builder.push_record([
            format!("{}", idx + 1),
            format!("{} ({})", item.name, item.id),
            item.kind.clone(),
            item.sku.clone(),
            stored_price(item.price, &item.currency)?,
            String::from(if item.is_featured { "yes" } else { "" }),
        ]);
    }

    write_table(&mut out, builder, 4)
}

/// Write the products listed in the catalog.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing fails or a price is out of range.
pub fn write_catalog(mut out: impl io::Write, catalog: &Catalog) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Product", "Category", "Brand", "Price", "Stock"]);

    for product in catalog.products() {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            product.brand.clone(),
            money_from_minor(product.price, product.currency)?.to_string(),
            product.stock.to_string(),
        ]);
    }

    write_table(&mut out, builder, 4)
}

/// Write an order summary: one row per line, then subtotal, tax, shipping and total.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing fails or an amount is out of range.
pub fn write_order(
    mut out: impl io::Write,
    order: &OrderRequest,
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Unit Price", "Qty", "Line Total"]);

    for (idx, line) in order.items.iter().enumerate() {
        let line_total = line
            .unit_price
            .checked_mul(u64::from(line.quantity))
            .ok_or_else(|| ReceiptError::Overflow(line.product_id.clone()))?;

        builder.push_record([
            format!("{}", idx + 1),
            format!("{} ({})", line.name, line.product_id),
            money_from_minor(line.unit_price, currency)?.to_string(),
            line.quantity.to_string(),
            money_from_minor(line_total, currency)?.to_string(),
        ]);
    }

    write_table(&mut out, builder, 2)?;

    let rows = [
        ("Subtotal:", Money::from_minor(order.subtotal, currency)),
        ("Tax:", Money::from_minor(order.tax, currency)),
        ("Shipping:", Money::from_minor(order.shipping, currency)),
        ("Total:", Money::from_minor(order.total, currency)),
    ];

    write_summary_lines(&mut out, &rows)
}

/// Write monthly revenue and per-status order counts.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing fails or revenue is out of range.
pub fn write_analytics(
    mut out: impl io::Write,
    months: &[MonthlyRevenue],
    statuses: &[(OrderStatus, usize)],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Month", "Orders", "Revenue"]);

    for month in months {
        builder.push_record([
            format!("{}-{:02}", month.year, month.month),
            month.orders.to_string(),
            money_from_minor(month.revenue, currency)?.to_string(),
        ]);
    }

    write_table(&mut out, builder, 1)?;

    let mut builder = Builder::default();

    builder.push_record(["Status", "Orders"]);

    for (status, count) in statuses {
        builder.push_record([status.label().to_string(), count.to_string()]);
    }

    write_table(&mut out, builder, 1)
}

fn stored_price(minor: u64, code: &str) -> Result<String, ReceiptError> {
    Ok(money_from_minor(minor, currency(code)?)?.to_string())
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned_from: usize,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Columns::new(right_aligned_from..), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_summary_lines(
    out: &mut impl io::Write,
    rows: &[(&str, Money<'_, Currency>)],
) -> Result<(), ReceiptError> {
    let values: Vec<String> = rows.iter().map(|(_, value)| value.to_string()).collect();

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = values.iter().map(String::len).max().unwrap_or(0);

    for ((label, _), value) in rows.iter().zip(&values) {
        writeln!(out, " {label:<label_width$} {value:>value_width$}")?;
    }

    writeln!(out)?;

    Ok(())
}
