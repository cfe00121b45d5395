use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Stock position of an inventory record relative to its thresholds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    Normal,
    Overstocked,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "out_of_stock"),
            StockStatus::LowStock => write!(f, "low_stock"),
            StockStatus::Normal => write!(f, "normal"),
            StockStatus::Overstocked => write!(f, "overstocked"),
        }
    }
}

/// Classifies a stock quantity against its thresholds.
///
/// Rules, checked in order:
/// 1. A quantity of zero (or less) is out of stock.
/// 2. A quantity at or below the reorder point is low.
/// 3. A quantity above the maximum stock (when one is set) is overstocked.
/// 4. Everything else is normal.
///
/// The minimum stock threshold is carried in the signature for parity with
/// the record schema but does not drive classification.
///
/// This is a pure function: callers decide how to persist or react.
pub fn classify(
    quantity: i32,
    _minimum_stock: i32,
    maximum_stock: Option<i32>,
    reorder_point: i32,
) -> StockStatus {
    if quantity <= 0 {
        return StockStatus::OutOfStock;
    }
    if quantity <= reorder_point {
        return StockStatus::LowStock;
    }
    if let Some(max) = maximum_stock {
        if quantity > max {
            return StockStatus::Overstocked;
        }
    }
    StockStatus::Normal
}
