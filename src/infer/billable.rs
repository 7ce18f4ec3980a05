//! Billable (chargeable) freight weight.
//!
//! Carriers charge on the greater of actual and volumetric weight. Volumetric
//! weight uses the 5000 cm³/kg divisor, i.e. 200 kg per m³.

use crate::domain::{InferredInput, Provenance};

pub const VOLUMETRIC_KG_PER_M3: f64 = 200.0;

pub fn volumetric_weight_kg(volume_m3: f64) -> f64 {
    volume_m3 * VOLUMETRIC_KG_PER_M3
}

pub fn billable_weight_kg(weight_g: f64, volume_m3: f64) -> f64 {
    (weight_g / 1000.0).max(volumetric_weight_kg(volume_m3))
}

/// Combine resolved weight and volume into billable weight.
///
/// Confidence is the weaker input's; the range applies the same max rule to
/// each percentile independently.
pub fn combine_billable_weight(
    weight_g: &InferredInput<f64>,
    volume_m3: &InferredInput<f64>,
) -> InferredInput<f64> {
    let actual_kg = weight_g.value / 1000.0;
    let volumetric_kg = volumetric_weight_kg(volume_m3.value);
    let value = actual_kg.max(volumetric_kg);

    let confidence = weight_g.confidence.min(volume_m3.confidence);
    let weakest = if volume_m3.confidence < weight_g.confidence {
        volume_m3.source
    } else {
        weight_g.source
    };

    let range = weight_g
        .range_or_exact()
        .zip_with(volume_m3.range_or_exact(), billable_weight_kg);

    let governs = if volumetric_kg > actual_kg { "volumetric" } else { "actual" };
    let explanation = format!(
        "Billable {value:.3} kg = max(actual {actual_kg:.3} kg, volumetric {volumetric_kg:.3} kg); {governs} weight governs."
    );

    InferredInput::inferred(
        value,
        Provenance::Derived {
            inputs: vec!["unit_weight_g".to_string(), "unit_volume_m3".to_string()],
            weakest,
        },
        confidence,
        explanation,
    )
    .with_range(range)
}
