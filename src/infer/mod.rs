//! Evidence-ranked inference of cost-model inputs.
//!
//! `infer_cost_inputs` is the entry point. It resolves the category and HS
//! chapter once, then runs the field resolvers in dependency order:
//!
//! shipping mode, weight, volume, carton pack -> billable weight -> duty, fees -> freight

pub mod billable;
pub mod category;
pub mod range;
pub mod resolvers;
pub mod waterfall;

use tracing::{debug, info_span};

use crate::domain::{Classification, InferredInputs, MarketEstimate, UserOverrides};
use crate::tables::category_prior;

pub use billable::combine_billable_weight;
pub use category::{determine_category, determine_category_key, extract_hs2, CategorySignals};
pub use range::{build_range, ConfidenceBand};
pub use resolvers::PriorContext;

/// Resolve every cost-model field for one product.
pub fn infer_cost_inputs(
    classification: &Classification,
    market: Option<&MarketEstimate>,
    overrides: &UserOverrides,
) -> InferredInputs {
    let span = info_span!("infer", product = %classification.product_name);
    let _guard = span.enter();

    let hs2 = extract_hs2(classification, market);
    let signals = CategorySignals {
        hs_code: hs2.as_deref(),
        ..CategorySignals::from_classification(classification)
    };
    let category = determine_category(&signals);
    debug!(
        category = category.key.as_str(),
        rule = category.rule.describe(),
        hs2 = hs2.as_deref().unwrap_or("-"),
        "category resolved"
    );

    let ctx = PriorContext {
        key: category.key,
        prior: category_prior(category.key),
    };

    let shipping_mode = resolvers::resolve_shipping_mode(overrides.shipping_mode);
    let unit_weight_g = resolvers::resolve_unit_weight(
        overrides.unit_weight_g,
        classification.label_data.as_ref(),
        &ctx,
    );
    let unit_volume_m3 = resolvers::resolve_unit_volume(overrides.unit_volume_m3, &ctx);
    let carton_pack = resolvers::resolve_carton_pack(overrides.carton_pack);
    let billable_weight_kg = combine_billable_weight(&unit_weight_g, &unit_volume_m3);
    let duty_rate = resolvers::resolve_duty_rate(overrides.duty_rate, hs2.as_deref(), &ctx);
    let fees_per_unit = resolvers::resolve_fees_per_unit(&ctx);
    let shipping_per_unit = resolvers::resolve_shipping_per_unit(
        &shipping_mode,
        &billable_weight_kg,
        &unit_volume_m3,
        &ctx,
    );

    InferredInputs {
        category,
        hs2,
        shipping_mode,
        unit_weight_g,
        unit_volume_m3,
        carton_pack,
        billable_weight_kg,
        duty_rate,
        fees_per_unit,
        shipping_per_unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CategoryKey, CategoryRule, InferenceSource, InferredInput, LabelData, RangeTriple,
        ShippingMode,
    };

    fn toy() -> Classification {
        Classification {
            product_name: "Plush bear".to_string(),
            description: "Soft stuffed animal".to_string(),
            category: "toy".to_string(),
            keywords: vec!["plush".to_string()],
            confidence: 0.9,
            ..Classification::default()
        }
    }

    fn assert_well_formed(field: &str, input: &InferredInput<f64>, floor: f64) {
        let r = input.range.unwrap_or_else(|| panic!("{field} has no range"));
        assert!(r.is_ordered(), "{field}: {r:?}");
        assert!(r.p10 >= floor, "{field}: {r:?}");
    }

    #[test]
    fn toy_without_evidence_uses_priors() {
        let out = infer_cost_inputs(&toy(), None, &UserOverrides::default());
        assert_eq!(out.category.key, CategoryKey::Toy);
        assert_eq!(out.category.rule, CategoryRule::CategoryName);
        assert_eq!(out.hs2, None);

        assert_eq!(out.unit_weight_g.value, 150.0);
        assert_eq!(out.unit_weight_g.source, InferenceSource::FromCategory);
        assert_eq!(out.unit_weight_g.confidence, 60);

        assert_eq!(out.shipping_mode.value, ShippingMode::Ocean);
        assert_eq!(out.shipping_mode.confidence, 70);

        assert_eq!(out.duty_rate.value, 0.0);
        assert_eq!(out.carton_pack.value, 1);
    }

    #[test]
    fn toy_with_hs95_keeps_zero_duty_from_higher_tier() {
        let c = Classification {
            hs_code: Some("9503.00".to_string()),
            ..toy()
        };
        let out = infer_cost_inputs(&c, None, &UserOverrides::default());
        assert_eq!(out.hs2.as_deref(), Some("95"));
        assert_eq!(out.duty_rate.value, 0.0);
        assert_eq!(out.duty_rate.source, InferenceSource::FromHsEstimate);
    }

    #[test]
    fn label_weight_beats_category_prior() {
        let c = Classification {
            label_data: Some(LabelData {
                net_weight: Some("200g".to_string()),
                ingredients: None,
            }),
            ..toy()
        };
        let out = infer_cost_inputs(&c, None, &UserOverrides::default());
        assert_eq!(out.unit_weight_g.value, 200.0);
        assert_eq!(out.unit_weight_g.source, InferenceSource::Label);
        assert_eq!(out.unit_weight_g.confidence, 85);
    }

    #[test]
    fn knitted_apparel_duty_from_hs_chapter() {
        let c = Classification {
            product_name: "Cotton T-shirt".to_string(),
            category: "apparel".to_string(),
            hs_code: Some("6109.10".to_string()),
            ..Classification::default()
        };
        let out = infer_cost_inputs(&c, None, &UserOverrides::default());
        assert_eq!(out.duty_rate.value, 0.165);
        assert_eq!(out.duty_rate.confidence, 80);
        assert_eq!(out.duty_rate.source, InferenceSource::FromHsEstimate);
    }

    #[test]
    fn market_candidate_supplies_chapter() {
        let market = MarketEstimate {
            hs_code_candidates: vec![crate::domain::HsCodeCandidate {
                code: "6204.62".to_string(),
                confidence: 0.6,
                rationale: "woven trousers".to_string(),
            }],
            observed_suppliers: vec![],
        };
        let c = Classification {
            product_name: "Trousers".to_string(),
            ..Classification::default()
        };
        let out = infer_cost_inputs(&c, Some(&market), &UserOverrides::default());
        assert_eq!(out.hs2.as_deref(), Some("62"));
        assert_eq!(out.category.key, CategoryKey::Apparel);
        assert_eq!(out.category.rule, CategoryRule::HsChapter);
        assert_eq!(out.duty_rate.value, 0.16);
    }

    #[test]
    fn overrides_are_authoritative() {
        let overrides = UserOverrides {
            shipping_mode: Some(ShippingMode::Air),
            unit_weight_g: Some(400.0),
            unit_volume_m3: Some(0.003),
            carton_pack: Some(240),
            duty_rate: Some(0.12),
        };
        let out = infer_cost_inputs(&toy(), None, &overrides);

        for (field, input) in [
            ("weight", &out.unit_weight_g),
            ("volume", &out.unit_volume_m3),
            ("duty", &out.duty_rate),
        ] {
            assert_eq!(input.source, InferenceSource::User, "{field}");
            assert_eq!(input.confidence, 100, "{field}");
            assert_eq!(input.range, Some(RangeTriple::exact(input.value)), "{field}");
        }
        assert_eq!(out.shipping_mode.source, InferenceSource::User);
        assert_eq!(out.carton_pack.value, 240);
        assert_eq!(out.carton_pack.range, Some(RangeTriple::exact(240.0)));

        // Freight still carries uncertainty from the category base rate.
        assert!(out.shipping_per_unit.confidence <= 65);
        assert!(!out.shipping_per_unit.range.unwrap().is_degenerate());
    }

    #[test]
    fn every_range_is_ordered_and_floored() {
        for key in CategoryKey::ALL {
            let c = Classification {
                product_name: "Item".to_string(),
                category: key.as_str().to_string(),
                ..Classification::default()
            };
            let out = infer_cost_inputs(&c, None, &UserOverrides::default());
            assert_eq!(out.category.key, key);
            assert_well_formed("weight", &out.unit_weight_g, 0.0);
            assert_well_formed("volume", &out.unit_volume_m3, 0.0001);
            assert_well_formed("billable", &out.billable_weight_kg, 0.0);
            assert_well_formed("duty", &out.duty_rate, 0.0);
            assert_well_formed("fees", &out.fees_per_unit, 0.0);
            assert_well_formed("freight", &out.shipping_per_unit, 0.0);
            assert!(out.billable_weight_kg.confidence <= out.unit_weight_g.confidence);
            assert!(out.billable_weight_kg.confidence <= out.unit_volume_m3.confidence);
        }
    }
}
