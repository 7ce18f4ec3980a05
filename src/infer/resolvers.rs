//! Per-field resolvers.
//!
//! Each resolver is a `Waterfall` over the tiers that can supply its field:
//! user override, extracted label evidence, HS chapter data, category prior,
//! and finally a hard assumption. Confidence per tier is fixed here; range
//! width always comes from `build_range`.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::domain::{
    CategoryKey, InferenceSource, InferredInput, LabelData, Provenance, RangeTriple, ShippingMode,
};
use crate::infer::range::build_range;
use crate::infer::waterfall::Waterfall;
use crate::tables::{hs2_duty, CategoryPrior};

pub const SHIPPING_ASSUMED_CONFIDENCE: u8 = 70;
pub const LABEL_WEIGHT_CONFIDENCE: u8 = 85;
pub const CATEGORY_WEIGHT_CONFIDENCE: u8 = 60;
pub const CATEGORY_VOLUME_CONFIDENCE: u8 = 50;
pub const CARTON_ASSUMED_CONFIDENCE: u8 = 30;
pub const HS_DUTY_CONFIDENCE: u8 = 80;
pub const CATEGORY_DUTY_CONFIDENCE: u8 = 60;
pub const ASSUMED_DUTY_CONFIDENCE: u8 = 25;
const FALLBACK_CONFIDENCE: u8 = 20;
pub const CATEGORY_FEES_CONFIDENCE: u8 = 70;
/// Freight never reports more than medium confidence; base rates are category averages.
pub const FREIGHT_CONFIDENCE_CAP: u8 = 65;

pub const ASSUMED_DUTY_RATE: f64 = 0.05;
pub const VOLUME_FLOOR_M3: f64 = 0.0001;
pub const CARTON_FLOOR: f64 = 1.0;

const WEIGHT_SENSITIVITY: f64 = 0.4;
const VOLUME_SENSITIVITY: f64 = 0.3;
const MAX_FREIGHT_ADJUSTMENT: f64 = 0.5;

/// The category a resolver falls back to.
#[derive(Debug, Clone, Copy)]
pub struct PriorContext {
    pub key: CategoryKey,
    pub prior: &'static CategoryPrior,
}

fn category_provenance(ctx: &PriorContext) -> Provenance {
    Provenance::CategoryPrior { category: ctx.key }
}

pub fn resolve_shipping_mode(user: Option<ShippingMode>) -> InferredInput<ShippingMode> {
    Waterfall::new("shipping_mode")
        .tier("user", || {
            user.map(|mode| {
                InferredInput::user(mode, format!("Shipping mode set to {}.", mode.display_name()))
            })
        })
        .resolve(|| {
            InferredInput::inferred(
                ShippingMode::Ocean,
                Provenance::Assumption {
                    reason: "shipping mode not specified".to_string(),
                },
                SHIPPING_ASSUMED_CONFIDENCE,
                "Assumed ocean freight: the common mode for imported goods and the cheaper default.",
            )
        })
}

pub fn resolve_unit_weight(
    user: Option<f64>,
    label: Option<&LabelData>,
    ctx: &PriorContext,
) -> InferredInput<f64> {
    let net_weight = label.and_then(|l| l.net_weight.as_deref());

    Waterfall::new("unit_weight_g")
        .tier("user", || {
            user.map(|g| {
                InferredInput::user(g, format!("Unit weight set to {g:.0} g."))
                    .with_range(RangeTriple::exact(g))
            })
        })
        .tier("label", || {
            let raw = net_weight?;
            let Some(grams) = parse_weight_grams(raw) else {
                warn!(raw, "label net weight not parseable; skipping label tier");
                return None;
            };
            Some(
                InferredInput::inferred(
                    grams,
                    Provenance::LabelText { raw: raw.to_string() },
                    LABEL_WEIGHT_CONFIDENCE,
                    format!("Read {grams:.0} g from label net weight \"{raw}\"."),
                )
                .with_range(build_range(grams, LABEL_WEIGHT_CONFIDENCE, 0.0)),
            )
        })
        .tier("category", || {
            let g = ctx.prior.weight_g;
            Some(
                InferredInput::inferred(
                    g,
                    category_provenance(ctx),
                    CATEGORY_WEIGHT_CONFIDENCE,
                    format!("Typical {} unit weight of {g:.0} g.", ctx.key.display_name()),
                )
                .with_range(build_range(g, CATEGORY_WEIGHT_CONFIDENCE, 0.0)),
            )
        })
        .resolve(|| {
            let g = ctx.prior.weight_g;
            unreachable_fallback("unit_weight_g", g, format!("{g:.0} g"))
        })
}

pub fn resolve_unit_volume(user: Option<f64>, ctx: &PriorContext) -> InferredInput<f64> {
    Waterfall::new("unit_volume_m3")
        .tier("user", || {
            user.map(|v| {
                InferredInput::user(v, format!("Unit volume set to {v:.4} m³."))
                    .with_range(RangeTriple::exact(v))
            })
        })
        .tier("category", || {
            let v = ctx.prior.volume_m3;
            Some(
                InferredInput::inferred(
                    v,
                    category_provenance(ctx),
                    CATEGORY_VOLUME_CONFIDENCE,
                    format!(
                        "Typical {} packed unit volume of {v:.4} m³; volume is rarely observable.",
                        ctx.key.display_name()
                    ),
                )
                .with_range(build_range(v, CATEGORY_VOLUME_CONFIDENCE, VOLUME_FLOOR_M3)),
            )
        })
        .resolve(|| {
            let v = ctx.prior.volume_m3;
            unreachable_fallback("unit_volume_m3", v, format!("{v:.4} m³"))
        })
}

/// Units per shipment. Caller-declared; the category carton size is not used.
pub fn resolve_carton_pack(user: Option<u32>) -> InferredInput<u32> {
    Waterfall::new("carton_pack")
        .tier("user", || {
            user.map(|n| {
                InferredInput::user(n, format!("{n} units per shipment."))
                    .with_range(RangeTriple::exact(n as f64))
            })
        })
        .resolve(|| {
            InferredInput::inferred(
                1,
                Provenance::Assumption {
                    reason: "units per shipment not declared".to_string(),
                },
                CARTON_ASSUMED_CONFIDENCE,
                "Assumed 1 unit per shipment until an order size is declared.",
            )
            .with_range(build_range(1.0, CARTON_ASSUMED_CONFIDENCE, CARTON_FLOOR))
        })
}

pub fn resolve_duty_rate(
    user: Option<f64>,
    hs2: Option<&str>,
    ctx: &PriorContext,
) -> InferredInput<f64> {
    Waterfall::new("duty_rate")
        .tier("user", || {
            user.map(|rate| {
                InferredInput::user(rate, format!("Duty rate pinned at {:.1}%.", rate * 100.0))
                    .with_range(RangeTriple::exact(rate))
            })
        })
        .tier("hs_chapter", || {
            let chapter = hs2?;
            let entry = hs2_duty(chapter)?;
            Some(
                InferredInput::inferred(
                    entry.rate,
                    Provenance::HsChapter {
                        chapter: chapter.to_string(),
                        description: entry.description.to_string(),
                    },
                    HS_DUTY_CONFIDENCE,
                    format!(
                        "HS chapter {chapter} ({}) duty of {:.1}%.",
                        entry.description,
                        entry.rate * 100.0
                    ),
                )
                .with_range(build_range(entry.rate, HS_DUTY_CONFIDENCE, 0.0)),
            )
        })
        .tier("category", || {
            let rate = ctx.prior.duty_rate;
            if !(rate.is_finite() && rate >= 0.0) {
                return None;
            }
            Some(
                InferredInput::inferred(
                    rate,
                    category_provenance(ctx),
                    CATEGORY_DUTY_CONFIDENCE,
                    format!(
                        "Typical {} duty of {:.1}%; confirm with an HS code.",
                        ctx.key.display_name(),
                        rate * 100.0
                    ),
                )
                .with_range(build_range(rate, CATEGORY_DUTY_CONFIDENCE, 0.0)),
            )
        })
        .resolve(|| {
            InferredInput::inferred(
                ASSUMED_DUTY_RATE,
                Provenance::Assumption {
                    reason: "no HS chapter or category duty available".to_string(),
                },
                ASSUMED_DUTY_CONFIDENCE,
                format!("Assumed a generic {:.0}% duty.", ASSUMED_DUTY_RATE * 100.0),
            )
            .with_range(build_range(ASSUMED_DUTY_RATE, ASSUMED_DUTY_CONFIDENCE, 0.0))
        })
}

/// Handling fees are modeled per category only.
pub fn resolve_fees_per_unit(ctx: &PriorContext) -> InferredInput<f64> {
    let fees = ctx.prior.fees_per_unit;
    Waterfall::new("fees_per_unit")
        .tier("category", || {
            Some(
                InferredInput::inferred(
                    fees,
                    category_provenance(ctx),
                    CATEGORY_FEES_CONFIDENCE,
                    format!("Typical {} handling fees of ${fees:.2}/unit.", ctx.key.display_name()),
                )
                .with_range(build_range(fees, CATEGORY_FEES_CONFIDENCE, 0.0)),
            )
        })
        .resolve(|| unreachable_fallback("fees_per_unit", fees, format!("${fees:.2}/unit")))
}

/// Relative freight adjustment for a unit that deviates from the category's reference unit.
pub fn freight_adjustment(billable_kg: f64, volume_m3: f64, prior: &CategoryPrior) -> f64 {
    let ref_volume = prior.volume_m3;
    let ref_billable = crate::infer::billable::billable_weight_kg(prior.weight_g, ref_volume);
    let weight_adj = if ref_billable > 0.0 {
        WEIGHT_SENSITIVITY * (billable_kg / ref_billable - 1.0)
    } else {
        0.0
    };
    let volume_adj = if ref_volume > 0.0 {
        VOLUME_SENSITIVITY * (volume_m3 / ref_volume - 1.0)
    } else {
        0.0
    };
    (weight_adj + volume_adj).clamp(-MAX_FREIGHT_ADJUSTMENT, MAX_FREIGHT_ADJUSTMENT)
}

/// Per-unit freight from the category base rate for the resolved mode.
pub fn resolve_shipping_per_unit(
    mode: &InferredInput<ShippingMode>,
    billable_kg: &InferredInput<f64>,
    volume_m3: &InferredInput<f64>,
    ctx: &PriorContext,
) -> InferredInput<f64> {
    let base = match mode.value {
        ShippingMode::Air => ctx.prior.base_shipping_air,
        ShippingMode::Ocean => ctx.prior.base_shipping_ocean,
    };
    let adjustment = freight_adjustment(billable_kg.value, volume_m3.value, ctx.prior);
    let value = base * (1.0 + adjustment);
    let confidence = mode
        .confidence
        .min(billable_kg.confidence)
        .min(FREIGHT_CONFIDENCE_CAP);

    // The base rate is a category average, so freight is never stronger than that.
    let weakest = InferenceSource::FromCategory
        .max(mode.source)
        .max(billable_kg.source);

    InferredInput::inferred(
        value,
        Provenance::Derived {
            inputs: vec![
                "shipping_mode".to_string(),
                "billable_weight_kg".to_string(),
                "unit_volume_m3".to_string(),
            ],
            weakest,
        },
        confidence,
        format!(
            "{} base rate ${base:.2}/unit for {}, adjusted {:+.0}% for weight and size.",
            ctx.key.display_name(),
            mode.value.display_name(),
            adjustment * 100.0
        ),
    )
    .with_range(build_range(value, confidence, 0.0))
}

/// Terminal tier for fields whose category tier always returns `Some`.
///
/// `Waterfall::resolve` requires an assumption; these fields never reach it.
fn unreachable_fallback(field: &'static str, value: f64, shown: String) -> InferredInput<f64> {
    InferredInput::inferred(
        value,
        Provenance::Assumption {
            reason: format!("{field} had no usable tier"),
        },
        FALLBACK_CONFIDENCE,
        format!("Assumed {shown} for {field}."),
    )
}

/// Number (leading decimal point, decimal or thousands commas allowed) followed
/// by a weight unit.
const WEIGHT_PATTERN: &str = r"((?:\d+|[.,]\d+)(?:[.,]\d+)*)\s*(kilograms?|kilos?|kgs?|grammes?|grams?|grs?|gms?|g|ounces?|oz|pounds?|lbs?)\b";

fn weight_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(WEIGHT_PATTERN).ok()).as_ref()
}

/// Parse a net-weight string into grams.
///
/// Accepts `g`, `kg`, `oz`, `lb` (and spelled-out forms), a decimal comma, and a
/// thousands comma. The first number followed by a known unit wins, so
/// `"Net Wt 5.3 oz (150 g)"` reads as 5.3 oz. Returns `None` for anything else.
pub fn parse_weight_grams(raw: &str) -> Option<f64> {
    let text = raw.to_lowercase();
    weight_pattern()?.captures_iter(&text).find_map(|caps| {
        let value = parse_number(caps.get(1)?.as_str())?;
        let factor = unit_to_grams(caps.get(2)?.as_str())?;
        let grams = value * factor;
        (grams.is_finite() && grams > 0.0).then_some(grams)
    })
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim_end_matches(['.', ',']);
    let normalized = if s.contains('.') && s.contains(',') {
        s.replace(',', "")
    } else if let Some(pos) = s.rfind(',') {
        let decimals = s.len() - pos - 1;
        if decimals == 3 {
            s.replace(',', "")
        } else {
            s.replace(',', ".")
        }
    } else {
        s.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn unit_to_grams(unit: &str) -> Option<f64> {
    match unit {
        "g" | "gm" | "gms" | "gr" | "grs" | "gram" | "grams" | "gramme" | "grammes" => Some(1.0),
        "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => Some(1000.0),
        "oz" | "ounce" | "ounces" => Some(28.349_523_125),
        "lb" | "lbs" | "pound" | "pounds" => Some(453.592_37),
        _ => None,
    }
}
