//! Two-scenario landed cost.
//!
//! A `CostRange` is a pair of per-unit cost breakdowns built from one
//! `InferredInputs` bundle and a factory quote:
//!
//! - **standard**: typical factory price, median freight/duty/fees
//! - **conservative**: high factory price, p90 freight/duty/fees, and the
//!   per-shipment entry fee spread over the smallest plausible carton pack
//!
//! Duty is charged on the factory (customs) value.

use serde::{Deserialize, Serialize};

use crate::domain::{FactoryQuote, InferredInputs, RangeTriple};

/// Fixed charges per shipment, independent of unit count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipmentCosts {
    pub entry_fee_per_shipment: f64,
}

impl Default for ShipmentCosts {
    fn default() -> Self {
        Self {
            entry_fee_per_shipment: 35.0,
        }
    }
}

/// Per-unit cost breakdown for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostScenario {
    pub factory_price: f64,
    pub shipping: f64,
    pub duty: f64,
    pub fees: f64,
    pub landed: f64,
}

impl CostScenario {
    pub fn new(factory_price: f64, shipping: f64, duty: f64, fees: f64) -> Self {
        Self {
            factory_price,
            shipping,
            duty,
            fees,
            landed: factory_price + shipping + duty + fees,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub standard: CostScenario,
    pub conservative: CostScenario,
}

pub fn estimate_cost_range(
    inputs: &InferredInputs,
    quote: &FactoryQuote,
    shipment: &ShipmentCosts,
) -> CostRange {
    let shipping = inputs.shipping_per_unit.range_or_exact();
    let duty_rate = inputs.duty_rate.range_or_exact();
    let fees = inputs.fees_per_unit.range_or_exact();
    let pack = inputs
        .carton_pack
        .range
        .unwrap_or_else(|| RangeTriple::exact(inputs.carton_pack.value as f64));

    let entry_share = |units: f64| shipment.entry_fee_per_shipment / units.max(1.0);

    let factory = quote.typical();
    let standard = CostScenario::new(
        factory,
        shipping.p50,
        factory * duty_rate.p50,
        fees.p50 + entry_share(pack.p50),
    );

    let factory = quote.high;
    let conservative = CostScenario::new(
        factory,
        shipping.p90,
        factory * duty_rate.p90,
        fees.p90 + entry_share(pack.p10),
    );

    CostRange {
        standard,
        conservative,
    }
}
