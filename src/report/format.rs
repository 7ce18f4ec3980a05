//! Terminal formatting for estimates, batch lines and the prior table.
//!
//! Formatting lives here so inference and decision code never touch strings
//! meant for humans.

use crate::app::pipeline::{BatchItem, RunOutput};
use crate::decision::{DecisionSupport, MinMidMax};
use crate::domain::{CategoryKey, InferredInput, InferredInputs, RangeTriple};
use crate::infer::ConfidenceBand;
use crate::tables::category_prior;

fn money(v: f64) -> String {
    format!("${v:.2}")
}

fn money_range(r: &MinMidMax) -> String {
    format!("{} / {} / {}", money(r.min), money(r.mid), money(r.max))
}

fn pct(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn range_str(r: Option<RangeTriple>, decimals: usize) -> String {
    match r {
        Some(r) => format!(
            "[{:.d$} .. {:.d$} .. {:.d$}]",
            r.p10,
            r.p50,
            r.p90,
            d = decimals
        ),
        None => "-".to_string(),
    }
}

fn input_row<T>(label: &str, value: String, input: &InferredInput<T>, decimals: usize) -> String {
    format!(
        "  {:<18} {:>12}  {:<16} {:>3} {:<6}  {}\n",
        label,
        value,
        input.source.as_str(),
        input.confidence,
        ConfidenceBand::from_confidence(input.confidence).label(),
        range_str(input.range, decimals),
    )
}

/// Resolved inputs table.
pub fn format_inputs(inputs: &InferredInputs, explain: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Category: {} ({}) | HS chapter: {}\n",
        inputs.category.key.display_name(),
        inputs.category.rule.describe(),
        inputs.hs2.as_deref().unwrap_or("-"),
    ));
    out.push_str(&format!(
        "  {:<18} {:>12}  {:<16} {:>10}  {}\n",
        "field", "value", "source", "confidence", "p10 .. p50 .. p90"
    ));

    let rows = [
        input_row(
            "shipping mode",
            inputs.shipping_mode.value.display_name().to_string(),
            &inputs.shipping_mode,
            0,
        ),
        input_row("unit weight (g)", format!("{:.1}", inputs.unit_weight_g.value), &inputs.unit_weight_g, 1),
        input_row("unit volume (m3)", format!("{:.5}", inputs.unit_volume_m3.value), &inputs.unit_volume_m3, 5),
        input_row("carton pack", inputs.carton_pack.value.to_string(), &inputs.carton_pack, 0),
        input_row(
            "billable (kg)",
            format!("{:.3}", inputs.billable_weight_kg.value),
            &inputs.billable_weight_kg,
            3,
        ),
        input_row("duty rate", pct(inputs.duty_rate.value), &inputs.duty_rate, 3),
        input_row("fees / unit", money(inputs.fees_per_unit.value), &inputs.fees_per_unit, 3),
        input_row(
            "freight / unit",
            money(inputs.shipping_per_unit.value),
            &inputs.shipping_per_unit,
            3,
        ),
    ];
    for row in rows {
        out.push_str(&row);
    }

    if explain {
        out.push_str("\nExplanations:\n");
        let explanations = [
            ("shipping mode", &inputs.shipping_mode.explanation),
            ("unit weight", &inputs.unit_weight_g.explanation),
            ("unit volume", &inputs.unit_volume_m3.explanation),
            ("carton pack", &inputs.carton_pack.explanation),
            ("billable", &inputs.billable_weight_kg.explanation),
            ("duty rate", &inputs.duty_rate.explanation),
            ("fees", &inputs.fees_per_unit.explanation),
            ("freight", &inputs.shipping_per_unit.explanation),
        ];
        for (label, text) in explanations {
            out.push_str(&format!("  {label}: {text}\n"));
        }
    }
    out
}

pub fn format_decision(decision: &DecisionSupport) -> String {
    let mut out = String::new();
    let lc = &decision.landed_cost_per_unit;

    out.push_str(&format!(
        "\nLanded cost / unit (min / mid / max), confidence {}:\n",
        decision.confidence_tier.as_str()
    ));
    for (label, r) in [
        ("factory", &lc.factory_price),
        ("freight", &lc.shipping),
        ("duty", &lc.duty),
        ("fees", &lc.fees),
        ("landed", &lc.landed),
    ] {
        out.push_str(&format!("  {label:<8} {}\n", money_range(r)));
    }

    out.push_str(&format!(
        "\nDuty band: {} - {}{}\n",
        pct(decision.duty_band.low),
        pct(decision.duty_band.high),
        if decision.duty_band.has_signal { "" } else { " (no duty signal yet)" },
    ));

    out.push_str("HS candidates:\n");
    for c in &decision.hs_candidates {
        out.push_str(&format!(
            "  {:<10} {:>5.1}  {:?}  {}\n",
            c.code, c.confidence, c.source, c.description
        ));
    }
    if let Some(rule) = &decision.hybrid_rule {
        out.push_str(&format!(
            "  hybrid: {} vs {}. {}\n",
            rule.primary.code, rule.alternate.code, rule.guidance
        ));
    }

    out.push_str(&format!("\nBreak-even: {}\n", money_range(&decision.break_even)));
    for t in &decision.margin_targets {
        out.push_str(&format!(
            "  shelf price for {:>3.0}% margin: {}\n",
            t.margin * 100.0,
            money_range(&t.shelf_price)
        ));
    }

    if let Some(p) = &decision.profit {
        out.push_str(&format!(
            "\nAt retail {}: profit/unit {} | margin {:.1}% .. {:.1}%\n",
            money(p.retail_price),
            money_range(&p.profit_per_unit),
            p.margin_pct.min,
            p.margin_pct.max,
        ));
    }

    out.push_str("\nQuantity plan:\n");
    for plan in &decision.quantity_plans {
        out.push_str(&format!("  {:>5} units  landed {}", plan.quantity, money_range(&plan.total_landed)));
        if let Some(profit) = &plan.total_profit {
            out.push_str(&format!("  profit {}", money_range(profit)));
        }
        out.push('\n');
    }

    out.push_str("\nBlockers:\n");
    for b in &decision.blockers {
        out.push_str(&format!("  - {}\n", b.message));
    }
    out
}

/// Full `lc estimate` output.
pub fn format_estimate(run: &RunOutput, explain: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== lc - Landed Cost: {} ===\n",
        run.request.classification.product_name
    ));
    out.push_str(&format_inputs(&run.inputs, explain));
    out.push_str(&format_decision(&run.decision));
    out
}

/// One line per batch entry.
pub fn format_batch_line(item: &BatchItem) -> String {
    let name = item.path.display();
    match &item.result {
        Ok(run) => {
            let landed = &run.decision.landed_cost_per_unit.landed;
            format!(
                "{name}: {} [{}] landed {} ({})",
                run.request.classification.product_name,
                run.inputs.category.key.as_str(),
                money_range(landed),
                run.decision.confidence_tier.as_str(),
            )
        }
        Err(err) => format!("{name}: ERROR {err}"),
    }
}

pub fn format_categories() -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<22} {:>8} {:>9} {:>6} {:>6} {:>6} {:>7} {:>7}\n",
        "category", "weight_g", "vol_m3", "carton", "duty", "fees", "air", "ocean"
    ));
    for key in CategoryKey::ALL {
        let p = category_prior(key);
        out.push_str(&format!(
            "{:<22} {:>8.0} {:>9.4} {:>6} {:>6} {:>6.2} {:>7.2} {:>7.2}\n",
            key.as_str(),
            p.weight_g,
            p.volume_m3,
            p.carton_pack,
            pct(p.duty_rate),
            p.fees_per_unit,
            p.base_shipping_air,
            p.base_shipping_ocean,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_estimate;
    use crate::domain::EstimateConfig;
    use crate::error::AppError;
    use crate::io::input::parse_request;
    use std::path::PathBuf;

    fn run() -> RunOutput {
        let req = parse_request(
            r#"{
                "classification": { "productName": "Plush bear", "category": "toy" },
                "factoryPrice": { "low": 2.0, "high": 3.0 },
                "retailPrice": 12.0
            }"#,
        )
        .unwrap();
        run_estimate(req, &EstimateConfig::default()).unwrap()
    }

    #[test]
    fn estimate_output_mentions_key_sections() {
        let text = format_estimate(&run(), true);
        assert!(text.contains("Plush bear"));
        assert!(text.contains("from_category"));
        assert!(text.contains("Break-even"));
        assert!(text.contains("Explanations:"));
        assert!(text.contains("1000 units"));
        assert!(text.contains("profit"));
    }

    #[test]
    fn batch_lines_show_errors_inline() {
        let ok = BatchItem {
            path: PathBuf::from("bear.json"),
            result: Ok(run()),
        };
        assert!(format_batch_line(&ok).starts_with("bear.json: Plush bear [toy]"));

        let bad = BatchItem {
            path: PathBuf::from("x.json"),
            result: Err(AppError::new(2, "boom")),
        };
        assert_eq!(format_batch_line(&bad), "x.json: ERROR boom");
    }

    #[test]
    fn category_table_lists_every_key() {
        let table = format_categories();
        assert_eq!(table.lines().count(), CategoryKey::ALL.len() + 1);
        assert!(table.contains("jewelry_accessories"));
    }

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(money(1.005_1), "$1.01");
        assert_eq!(pct(0.165), "16.5%");
    }
}
