//! Quantity, pricing and profit projections over a two-point cost range.

use serde::{Deserialize, Serialize};

/// Order sizes the quantity planner reports.
pub const PLAN_QUANTITIES: [u32; 3] = [100, 300, 1000];

/// Target gross margins (fraction of shelf price).
pub const TARGET_MARGINS: [f64; 3] = [0.30, 0.40, 0.50];

/// Min, mean and max of two scenario values.
///
/// Not a statistical range: there are exactly two points, so `mid` is their
/// arithmetic mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMidMax {
    pub min: f64,
    pub mid: f64,
    pub max: f64,
}

impl MinMidMax {
    pub fn from_pair(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            mid: (a + b) / 2.0,
            max: a.max(b),
        }
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            min: f(self.min),
            mid: f(self.mid),
            max: f(self.max),
        }
    }

    pub fn scale(self, k: f64) -> Self {
        self.map(|v| v * k)
    }

    /// Apply a decreasing function, swapping bounds so `min <= max` holds.
    pub fn map_inverted(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            min: f(self.max),
            mid: f(self.mid),
            max: f(self.min),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityPlan {
    pub quantity: u32,
    pub total_landed: MinMidMax,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_profit: Option<MinMidMax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginTarget {
    pub margin: f64,
    pub shelf_price: MinMidMax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitProjection {
    pub retail_price: f64,
    pub profit_per_unit: MinMidMax,
    pub margin_pct: MinMidMax,
}

/// Price at which `margin` of the shelf price is left after landed cost.
pub fn required_shelf_price(landed: f64, margin: f64) -> f64 {
    landed / (1.0 - margin)
}

pub fn margin_targets(landed: MinMidMax) -> Vec<MarginTarget> {
    TARGET_MARGINS
        .iter()
        .map(|&margin| MarginTarget {
            margin,
            shelf_price: landed.map(|v| required_shelf_price(v, margin)),
        })
        .collect()
}

/// Profit against a retail price. The highest cost gives the lowest profit.
pub fn profit_projection(landed: MinMidMax, retail_price: f64) -> ProfitProjection {
    let profit_per_unit = landed.map_inverted(|cost| retail_price - cost);
    let margin_pct = profit_per_unit.map(|p| p / retail_price * 100.0);
    ProfitProjection {
        retail_price,
        profit_per_unit,
        margin_pct,
    }
}

pub fn quantity_plans(landed: MinMidMax, profit: Option<&ProfitProjection>) -> Vec<QuantityPlan> {
    PLAN_QUANTITIES
        .iter()
        .map(|&quantity| {
            let qty = f64::from(quantity);
            QuantityPlan {
                quantity,
                total_landed: landed.scale(qty),
                total_profit: profit.map(|p| p.profit_per_unit.scale(qty)),
            }
        })
        .collect()
}
