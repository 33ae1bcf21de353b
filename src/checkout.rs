//! Checkout
//!
//! Order total calculation and the order-creation payload built from a cart.

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing::{PriceError, money_from_minor, percent_of_minor},
    products::ProductId,
};

/// Errors raised while calculating order totals.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// A line's quantity multiplied by its price overflowed.
    #[error("line total overflowed")]
    Overflow,

    /// More units were requested than are in stock.
    #[error("product {id} has {available} in stock, {requested} requested")]
    InsufficientStock {
        /// Product identifier
        id: ProductId,
        /// Units requested
        requested: u32,
        /// Units in stock
        available: u32,
    },

    /// A quantity was given for a product that is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// A cart item is priced in a different currency than checkout.
    #[error("product {id} is priced in {found}, checkout uses {expected}")]
    CurrencyMismatch {
        /// Product identifier
        id: ProductId,
        /// Checkout currency code
        expected: &'static str,
        /// Currency code stored with the item
        found: String,
    },

    /// An order was placed with nothing in it.
    #[error("cannot place an order without items")]
    EmptyCart,

    /// Wrapped price conversion error.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Tax rate and flat shipping fee applied at checkout.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutRates<'a> {
    /// Tax rate applied to the subtotal
    pub tax_rate: Percentage,

    /// Flat shipping fee per order
    pub shipping: Money<'a, Currency>,
}

impl<'a> CheckoutRates<'a> {
    /// Create checkout rates.
    pub fn new(tax_rate: Percentage, shipping: Money<'a, Currency>) -> Self {
        Self { tax_rate, shipping }
    }

    /// Currency all totals are expressed in.
    pub fn currency(&self) -> &'a Currency {
        self.shipping.currency()
    }
}

/// A priced line of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderLine<'a> {
    /// Unit price
    pub price: Money<'a, Currency>,

    /// Number of units
    pub quantity: u32,
}

impl<'a> OrderLine<'a> {
    /// Create an order line.
    pub fn new(price: Money<'a, Currency>, quantity: u32) -> Self {
        Self { price, quantity }
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Overflow`] if the product overflows minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, CheckoutError> {
        let minor = self
            .price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(CheckoutError::Overflow)?;

        Ok(Money::from_minor(minor, self.price.currency()))
    }
}

/// Subtotal, tax, shipping and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals<'a> {
    /// Sum of line totals
    pub subtotal: Money<'a, Currency>,

    /// Tax on the subtotal
    pub tax: Money<'a, Currency>,

    /// Shipping fee
    pub shipping: Money<'a, Currency>,

    /// Subtotal plus tax plus shipping
    pub total: Money<'a, Currency>,
}

/// Calculate the totals for a single product bought once.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the price currency differs from the rates'
/// currency or the tax cannot be represented in minor units.
pub fn calculate_total<'a>(
    price: Money<'a, Currency>,
    rates: &CheckoutRates<'a>,
) -> Result<OrderTotals<'a>, CheckoutError> {
    order_totals(&[OrderLine::new(price, 1)], rates)
}

/// Calculate the totals for an order.
///
/// Tax is rounded to whole minor units. An order without lines costs nothing,
/// shipping included.
///
/// # Errors
///
/// Returns a [`CheckoutError`] on currency mismatch or arithmetic overflow.
pub fn order_totals<'a>(
    lines: &[OrderLine<'a>],
    rates: &CheckoutRates<'a>,
) -> Result<OrderTotals<'a>, CheckoutError> {
    let zero = Money::from_minor(0, rates.currency());

    if lines.is_empty() {
        return Ok(OrderTotals {
            subtotal: zero,
            tax: zero,
            shipping: zero,
            total: zero,
        });
    }

    let subtotal = lines
        .iter()
        .try_fold(zero, |acc, line| Ok::<_, CheckoutError>(acc.add(line.line_total()?)?))?;

    let tax = Money::from_minor(
        percent_of_minor(&rates.tax_rate, subtotal.to_minor_units())?,
        rates.currency(),
    );

    let total = subtotal.add(tax)?.add(rates.shipping)?;

    Ok(OrderTotals {
        subtotal,
        tax,
        shipping: rates.shipping,
        total,
    })
}

/// A line of the order-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestLine {
    /// Product identifier
    pub product_id: ProductId,

    /// Product name at the time of ordering
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// Unit price in minor units
    pub unit_price: u64,
}

/// Payload submitted to the order-creation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Ordered lines
    pub items: Vec<OrderRequestLine>,

    /// ISO currency code of every amount
    pub currency: String,

    /// Subtotal in minor units
    pub subtotal: i64,

    /// Tax in minor units
    pub tax: i64,

    /// Shipping in minor units
    pub shipping: i64,

    /// Grand total in minor units
    pub total: i64,
}

impl OrderRequest {
    /// Build the order payload for the cart contents.
    ///
    /// Items default to a quantity of one; a quantity of zero leaves the item
    /// out of the order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a quantity names a product missing from
    /// the cart or exceeds the product's stock, an item was priced in another
    /// currency, or the totals cannot be computed.
    pub fn from_cart(
        cart: &Cart,
        quantities: &FxHashMap<ProductId, u32>,
        rates: &CheckoutRates<'static>,
    ) -> Result<Self, CheckoutError> {
        if let Some(id) = quantities.keys().find(|id| !cart.is_in_cart(id.as_str())) {
            return Err(CheckoutError::NotInCart(id.clone()));
        }

        let mut items = Vec::with_capacity(cart.len());
        let mut lines = Vec::with_capacity(cart.len());

        for item in cart.items() {
            let quantity = quantities.get(&item.id).copied().unwrap_or(1);

            if quantity == 0 {
                continue;
            }

            if item.currency != rates.currency().iso_alpha_code {
                return Err(CheckoutError::CurrencyMismatch {
                    id: item.id.clone(),
                    expected: rates.currency().iso_alpha_code,
                    found: item.currency.clone(),
                });
            }

            if quantity > item.stock {
                return Err(CheckoutError::InsufficientStock {
                    id: item.id.clone(),
                    requested: quantity,
                    available: item.stock,
                });
            }

            lines.push(OrderLine::new(
                money_from_minor(item.price, rates.currency())?,
                quantity,
            ));

            items.push(OrderRequestLine {
                product_id: item.id.clone(),
                name: item.name.clone(),
                quantity,
                unit_price: item.price,
            });
        }

        let totals = order_totals(&lines, rates)?;

        Ok(Self {
            items,
            currency: rates.currency().iso_alpha_code.to_string(),
            subtotal: totals.subtotal.to_minor_units(),
            tax: totals.tax.to_minor_units(),
            shipping: totals.shipping.to_minor_units(),
            total: totals.total.to_minor_units(),
        })
    }
}
