//! Commission arithmetic
//!
//! Pure functions over `Decimal` with strict 2-decimal money semantics.
//! Nothing here touches the database or the clock; given the same inputs
//! the results are always the same.

use payloads::Product;
use rust_decimal::{Decimal, RoundingStrategy};

use super::StoreError;

/// Round to cents, half-up at the midpoint: 10.999 -> 11.00, 10.333 -> 10.33.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of qty x base price over all lines, rounded to cents.
pub fn order_total(products: &[Product]) -> Decimal {
    round2(
        products
            .iter()
            .map(|p| Decimal::from(p.qty) * p.base_price)
            .sum(),
    )
}

/// Commission on a total at a percent rate, rounded to cents.
pub fn commission(order_total: Decimal, rate_percent: Decimal) -> Decimal {
    round2(order_total * rate_percent / Decimal::ONE_HUNDRED)
}

/// Validate and normalize order line items.
///
/// Requires a non-empty list where every line has a non-empty name, a
/// positive whole quantity, and a non-negative price with at most two
/// decimal places (checked by requiring price x 100 to be an integer).
pub fn validate_products(
    products: &[Product],
) -> Result<Vec<Product>, StoreError> {
    if products.is_empty() {
        return Err(StoreError::EmptyProductList);
    }
    let mut normalized = Vec::with_capacity(products.len());
    for product in products {
        let name = product.name.trim();
        if name.is_empty() {
            return Err(StoreError::ProductNameRequired);
        }
        if product.qty < 1 {
            return Err(StoreError::ProductQtyNotPositive);
        }
        if product.base_price < Decimal::ZERO {
            return Err(StoreError::ProductPriceNegative);
        }
        if !(product.base_price * Decimal::ONE_HUNDRED).is_integer() {
            return Err(StoreError::ProductPriceTooPrecise);
        }
        normalized.push(Product {
            name: name.to_string(),
            qty: product.qty,
            base_price: product.base_price,
        });
    }
    Ok(normalized)
}
