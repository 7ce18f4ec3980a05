//! Shared estimate pipeline used by the `estimate` and `batch` commands.
//!
//! request -> config overlay -> inference -> cost scenarios -> decision support
//!
//! The CLI handlers only decide what to print or export.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::cost::{estimate_cost_range, CostRange, ShipmentCosts};
use crate::decision::{build_decision_support, DecisionParams, DecisionSupport};
use crate::domain::{EstimateConfig, EstimateRequest, InferredInputs};
use crate::error::AppError;
use crate::infer::infer_cost_inputs;
use crate::io::input::{read_request_json, validate_retail_price};

/// All computed outputs of one estimate.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The request after config overlays were applied.
    pub request: EstimateRequest,
    pub inputs: InferredInputs,
    pub cost_range: CostRange,
    pub decision: DecisionSupport,
}

/// One batch entry; failures stay attached to their file.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: Result<RunOutput, AppError>,
}

fn apply_config(mut request: EstimateRequest, config: &EstimateConfig) -> EstimateRequest {
    if let Some(mode) = config.shipping_mode {
        request.overrides.shipping_mode = Some(mode);
    }
    if let Some(level) = config.evidence_level {
        request.evidence_level = level;
    }
    if request.retail_price.is_none() {
        request.retail_price = config.retail_price;
    }
    request
}

fn validate_config(config: &EstimateConfig) -> Result<(), AppError> {
    let fee = config.entry_fee_per_shipment;
    if !(fee.is_finite() && fee >= 0.0) {
        return Err(AppError::new(
            2,
            format!("Entry fee must be a non-negative number, got {fee}."),
        ));
    }
    validate_retail_price(config.retail_price)?;
    Ok(())
}

/// Run the full estimate for one validated request.
pub fn run_estimate(request: EstimateRequest, config: &EstimateConfig) -> Result<RunOutput, AppError> {
    validate_config(config)?;
    let request = apply_config(request, config);

    let inputs = infer_cost_inputs(
        &request.classification,
        request.market_estimate.as_ref(),
        &request.overrides,
    );

    let shipment = ShipmentCosts {
        entry_fee_per_shipment: config.entry_fee_per_shipment,
    };
    let cost_range = estimate_cost_range(&inputs, &request.factory_price, &shipment);

    let market_candidates = request
        .market_estimate
        .as_ref()
        .map(|m| m.hs_code_candidates.as_slice())
        .unwrap_or_default();
    let decision = build_decision_support(&DecisionParams {
        cost_range: &cost_range,
        evidence_level: request.evidence_level,
        similar_records: request.similar_records,
        retail_price: request.retail_price,
        category: inputs.category.key.as_str(),
        supplier_matches: request.supplier_match_count(),
        hs_candidates: market_candidates,
    });

    info!(
        product = %request.classification.product_name,
        category = inputs.category.key.as_str(),
        landed_mid = decision.landed_cost_per_unit.landed.mid,
        tier = decision.confidence_tier.as_str(),
        "estimate complete"
    );

    Ok(RunOutput {
        request,
        inputs,
        cost_range,
        decision,
    })
}

/// Read and run one request file.
pub fn run_estimate_file(path: &Path, config: &EstimateConfig) -> Result<RunOutput, AppError> {
    let request = read_request_json(path)?;
    run_estimate(request, config)
}

/// Run independent request files in parallel; output order follows `paths`.
pub fn run_batch(paths: &[PathBuf], config: &EstimateConfig) -> Vec<BatchItem> {
    let items: Vec<BatchItem> = paths
        .par_iter()
        .map(|path| BatchItem {
            path: path.clone(),
            result: run_estimate_file(path, config),
        })
        .collect();

    let failed = items.iter().filter(|i| i.result.is_err()).count();
    if failed > 0 {
        warn!(failed, total = items.len(), "batch finished with failures");
    } else {
        info!(total = items.len(), "batch finished");
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CategoryKey, Classification, EvidenceLevel, FactoryQuote, InferenceSource, ShippingMode,
        UserOverrides,
    };

    fn request() -> EstimateRequest {
        EstimateRequest {
            classification: Classification {
                product_name: "Plush bear".to_string(),
                category: "toy".to_string(),
                ..Classification::default()
            },
            market_estimate: None,
            overrides: UserOverrides::default(),
            factory_price: FactoryQuote { low: 2.0, high: 3.0 },
            retail_price: None,
            evidence_level: EvidenceLevel::CategoryBaseline,
            similar_records: 0,
            supplier_matches: None,
        }
    }

    #[test]
    fn estimate_ties_stages_together() {
        let run = run_estimate(request(), &EstimateConfig::default()).unwrap();
        assert_eq!(run.inputs.category.key, CategoryKey::Toy);
        assert_eq!(run.cost_range.standard.factory_price, 2.5);
        assert_eq!(run.decision.landed_cost_per_unit.landed.min, run.cost_range.standard.landed);
        assert!(run.decision.profit.is_none());
    }

    #[test]
    fn config_overlays_request() {
        let config = EstimateConfig {
            shipping_mode: Some(ShippingMode::Air),
            evidence_level: Some(EvidenceLevel::VerifiedQuote),
            retail_price: Some(15.0),
            ..EstimateConfig::default()
        };
        let run = run_estimate(request(), &config).unwrap();
        assert_eq!(run.inputs.shipping_mode.value, ShippingMode::Air);
        assert_eq!(run.inputs.shipping_mode.source, InferenceSource::User);
        assert_eq!(run.request.retail_price, Some(15.0));
        assert!(run.decision.profit.is_some());

        // A request's own retail price wins over the configured default.
        let req = EstimateRequest {
            retail_price: Some(20.0),
            ..request()
        };
        let run = run_estimate(req, &config).unwrap();
        assert_eq!(run.request.retail_price, Some(20.0));
    }

    #[test]
    fn hs_coded_request_without_market_keeps_neutral_blocker() {
        let req = EstimateRequest {
            classification: Classification {
                product_name: "Cotton T-shirt".to_string(),
                hs_code: Some("6109.10".to_string()),
                ..Classification::default()
            },
            ..request()
        };
        let run = run_estimate(req, &EstimateConfig::default()).unwrap();
        assert_eq!(run.inputs.duty_rate.source, InferenceSource::FromHsEstimate);

        let blocker = run
            .decision
            .blockers
            .iter()
            .find(|b| b.kind == crate::decision::BlockerKind::NoMarketHsCandidates)
            .unwrap();
        assert_eq!(blocker.message, "No market HS candidates; classification unconfirmed.");
        assert!(!blocker.message.contains("category"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EstimateConfig {
            entry_fee_per_shipment: -1.0,
            ..EstimateConfig::default()
        };
        assert_eq!(run_estimate(request(), &config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn batch_keeps_order_and_reports_failures() {
        let paths = vec![
            PathBuf::from("/nonexistent/a.json"),
            PathBuf::from("/nonexistent/b.json"),
        ];
        let items = run_batch(&paths, &EstimateConfig::default());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].path, paths[0]);
        assert_eq!(items[1].path, paths[1]);
        assert!(items.iter().all(|i| i.result.is_err()));
    }

    #[test]
    fn batch_runs_request_files() {
        let path = std::env::temp_dir().join(format!("lc-batch-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{
                "classification": { "productName": "Cotton T-shirt", "hsCode": "6109.10" },
                "factoryPrice": { "low": 3.0, "high": 4.0 }
            }"#,
        )
        .unwrap();

        let paths = vec![PathBuf::from("/nonexistent/a.json"), path.clone()];
        let items = run_batch(&paths, &EstimateConfig::default());
        std::fs::remove_file(&path).ok();

        assert!(items[0].result.is_err());
        let run = items[1].result.as_ref().unwrap();
        assert_eq!(run.inputs.category.key, CategoryKey::Apparel);
        assert_eq!(run.inputs.duty_rate.value, 0.165);
    }
}
