//! Category profile table.
//!
//! Physical and cost priors per category. These are the values every resolver
//! falls back to when there is no better evidence. Freight rates are per unit in
//! USD for a unit of the category's reference size.

use serde::Serialize;

use crate::domain::CategoryKey;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryPrior {
    pub key: CategoryKey,
    pub weight_g: f64,
    pub volume_m3: f64,
    pub carton_pack: u32,
    pub duty_rate: f64,
    pub fees_per_unit: f64,
    pub base_shipping_air: f64,
    pub base_shipping_ocean: f64,
}

#[allow(clippy::too_many_arguments)]
const fn prior(
    key: CategoryKey,
    weight_g: f64,
    volume_m3: f64,
    carton_pack: u32,
    duty_rate: f64,
    fees_per_unit: f64,
    base_shipping_air: f64,
    base_shipping_ocean: f64,
) -> CategoryPrior {
    CategoryPrior {
        key,
        weight_g,
        volume_m3,
        carton_pack,
        duty_rate,
        fees_per_unit,
        base_shipping_air,
        base_shipping_ocean,
    }
}

/// One row per `CategoryKey`, in `CategoryKey::ALL` order.
pub const CATEGORY_PRIORS: [CategoryPrior; 15] = [
    prior(CategoryKey::Toy, 150.0, 0.0012, 48, 0.0, 0.15, 1.10, 0.22),
    prior(CategoryKey::Food, 250.0, 0.0006, 24, 0.06, 0.12, 1.60, 0.18),
    prior(CategoryKey::Hybrid, 120.0, 0.0008, 48, 0.03, 0.15, 1.20, 0.20),
    prior(CategoryKey::Electronics, 300.0, 0.0015, 20, 0.02, 0.35, 2.40, 0.40),
    prior(CategoryKey::Apparel, 250.0, 0.0020, 50, 0.165, 0.20, 1.80, 0.30),
    prior(CategoryKey::Beauty, 180.0, 0.0004, 48, 0.0, 0.18, 1.40, 0.15),
    prior(CategoryKey::HomeKitchen, 600.0, 0.0040, 12, 0.034, 0.30, 4.20, 0.65),
    prior(CategoryKey::Furniture, 12_000.0, 0.1200, 1, 0.0, 3.50, 60.0, 9.00),
    prior(CategoryKey::Hardware, 450.0, 0.0010, 24, 0.04, 0.20, 2.80, 0.35),
    // Air rate carries the dangerous-goods surcharge.
    prior(CategoryKey::Chemical, 1_000.0, 0.0012, 12, 0.05, 0.45, 6.00, 0.55),
    prior(CategoryKey::Packaging, 80.0, 0.0030, 100, 0.03, 0.05, 1.60, 0.25),
    prior(CategoryKey::IndustrialParts, 900.0, 0.0015, 20, 0.025, 0.30, 4.50, 0.50),
    prior(CategoryKey::JewelryAccessories, 40.0, 0.0002, 100, 0.055, 0.10, 0.45, 0.06),
    prior(CategoryKey::StationeryOffice, 200.0, 0.0006, 50, 0.0, 0.10, 1.20, 0.14),
    prior(CategoryKey::Pet, 400.0, 0.0025, 24, 0.03, 0.20, 3.00, 0.40),
];

/// Prior for `key`. Total over the closed key set.
pub fn category_prior(key: CategoryKey) -> &'static CategoryPrior {
    CATEGORY_PRIORS
        .iter()
        .find(|p| p.key == key)
        .unwrap_or(&CATEGORY_PRIORS[6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_its_own_row() {
        for key in CategoryKey::ALL {
            assert_eq!(category_prior(key).key, key);
        }
    }

    #[test]
    fn default_row_index_is_home_kitchen() {
        assert_eq!(CATEGORY_PRIORS[6].key, CategoryKey::DEFAULT);
    }

    #[test]
    fn priors_are_physical() {
        for p in CATEGORY_PRIORS {
            assert!(p.weight_g > 0.0);
            assert!(p.volume_m3 > 0.0);
            assert!(p.carton_pack >= 1);
            assert!((0.0..1.0).contains(&p.duty_rate));
            assert!(p.base_shipping_air > p.base_shipping_ocean);
        }
    }

    #[test]
    fn toy_prior_matches_reference_values() {
        let toy = category_prior(CategoryKey::Toy);
        assert_eq!(toy.weight_g, 150.0);
        assert_eq!(toy.duty_rate, 0.0);
        assert_eq!(category_prior(CategoryKey::Apparel).duty_rate, 0.165);
    }
}
