//! Inventory products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

/// A stocked product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Units on hand. Never negative: decrements clamp at zero, so
    /// over-selling is permitted silently rather than rejected.
    pub stock: i64,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock_level: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Removes `quantity` units, clamping at zero.
    pub fn decrement_stock(&mut self, quantity: i64) {
        self.stock = (self.stock - quantity).max(0);
    }

    /// Adds `quantity` units back (returns, stock corrections).
    pub fn increment_stock(&mut self, quantity: i64) {
        self.stock += quantity;
    }

    /// `true` when stock has fallen to or below the configured minimum.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        match self.min_stock_level {
            Some(level) => self.stock <= level,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Chai Patti".to_string(),
            stock,
            unit_price: Money::new(500),
            cost_price: None,
            category: None,
            min_stock_level: Some(2),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut product = product(2);
        product.decrement_stock(5);
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn low_stock_uses_min_level() {
        assert!(product(2).is_low_stock());
        assert!(!product(3).is_low_stock());
    }
}
