//! Export an estimate as a JSON report.
//!
//! The report carries every resolved input (with provenance and ranges), both
//! cost scenarios and the decision view, so downstream tools never need to
//! re-run inference.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::app::pipeline::RunOutput;
use crate::cost::CostRange;
use crate::decision::DecisionSupport;
use crate::domain::InferredInputs;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport<'a> {
    pub tool: &'static str,
    pub generated_at: DateTime<Utc>,
    pub product_name: &'a str,
    pub inputs: &'a InferredInputs,
    pub cost_range: &'a CostRange,
    pub decision: &'a DecisionSupport,
}

impl<'a> EstimateReport<'a> {
    pub fn new(run: &'a RunOutput, generated_at: DateTime<Utc>) -> Self {
        Self {
            tool: "lc",
            generated_at,
            product_name: &run.request.classification.product_name,
            inputs: &run.inputs,
            cost_range: &run.cost_range,
            decision: &run.decision,
        }
    }
}

/// Write the report for one run to `path`.
pub fn write_report_json(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let report = EstimateReport::new(run, Utc::now());
    serde_json::to_writer_pretty(BufWriter::new(file), &report)
        .map_err(|e| AppError::new(4, format!("Failed to write report JSON: {e}")))?;

    info!(path = %path.display(), "report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_estimate;
    use crate::domain::EstimateConfig;
    use crate::io::input::parse_request;
    use chrono::TimeZone;

    #[test]
    fn report_json_has_expected_shape() {
        let req = parse_request(
            r#"{
                "classification": { "productName": "Plush bear", "category": "toy" },
                "factoryPrice": { "low": 2.0, "high": 3.0 },
                "retailPrice": 12.0
            }"#,
        )
        .unwrap();
        let run = run_estimate(req, &EstimateConfig::default()).unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let value = serde_json::to_value(EstimateReport::new(&run, at)).unwrap();
        assert_eq!(value["tool"], "lc");
        assert_eq!(value["generatedAt"], "2026-01-02T03:04:05Z");
        assert_eq!(value["productName"], "Plush bear");
        assert_eq!(value["inputs"]["unitWeightG"]["source"], "from_category");
        assert!(value["costRange"]["standard"]["landed"].is_number());
        assert_eq!(value["decision"]["quantityPlans"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn unwritable_path_is_an_output_error() {
        let req = parse_request(
            r#"{
                "classification": { "productName": "Mug" },
                "factoryPrice": { "low": 1.0, "high": 1.0 }
            }"#,
        )
        .unwrap();
        let run = run_estimate(req, &EstimateConfig::default()).unwrap();
        let err = write_report_json(Path::new("/nonexistent-dir/report.json"), &run).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
