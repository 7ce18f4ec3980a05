//! Read and validate estimate requests.
//!
//! Validation happens here so the inference core can treat any present
//! override as authoritative.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::domain::{EstimateRequest, FactoryQuote, UserOverrides};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("override {field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("override carton_pack must be at least 1")]
    EmptyCarton,
    #[error("override duty_rate must be in [0, 1), got {0}")]
    DutyOutOfRange(f64),
    #[error("factory price must satisfy 0 < low <= high, got low={low} high={high}")]
    FactoryQuote { low: f64, high: f64 },
    #[error("retail price must be a positive finite number, got {0}")]
    RetailPrice(f64),
    #[error("product name is empty")]
    MissingProductName,
}

fn positive(field: &'static str, value: Option<f64>) -> Result<(), InputError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(InputError::NotPositive { field, value: v }),
        _ => Ok(()),
    }
}

pub fn validate_overrides(overrides: &UserOverrides) -> Result<(), InputError> {
    positive("unit_weight_g", overrides.unit_weight_g)?;
    positive("unit_volume_m3", overrides.unit_volume_m3)?;
    if overrides.carton_pack == Some(0) {
        return Err(InputError::EmptyCarton);
    }
    if let Some(rate) = overrides.duty_rate {
        if !(rate.is_finite() && (0.0..1.0).contains(&rate)) {
            return Err(InputError::DutyOutOfRange(rate));
        }
    }
    Ok(())
}

pub fn validate_factory_quote(quote: &FactoryQuote) -> Result<(), InputError> {
    let FactoryQuote { low, high } = *quote;
    if low.is_finite() && high.is_finite() && low > 0.0 && low <= high {
        Ok(())
    } else {
        Err(InputError::FactoryQuote { low, high })
    }
}

pub fn validate_retail_price(price: Option<f64>) -> Result<(), InputError> {
    match price {
        Some(p) if !(p.is_finite() && p > 0.0) => Err(InputError::RetailPrice(p)),
        _ => Ok(()),
    }
}

pub fn validate_request(request: &EstimateRequest) -> Result<(), InputError> {
    if request.classification.product_name.trim().is_empty() {
        return Err(InputError::MissingProductName);
    }
    validate_overrides(&request.overrides)?;
    validate_factory_quote(&request.factory_price)?;
    validate_retail_price(request.retail_price)
}

pub fn parse_request(json: &str) -> Result<EstimateRequest, AppError> {
    let request: EstimateRequest = serde_json::from_str(json)
        .map_err(|e| AppError::new(2, format!("Invalid request JSON: {e}")))?;
    validate_request(&request)?;
    Ok(request)
}

/// Read one request file and validate it.
pub fn read_request_json(path: &Path) -> Result<EstimateRequest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open request '{}': {e}", path.display())))?;
    let request: EstimateRequest = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid request JSON '{}': {e}", path.display())))?;
    validate_request(&request)
        .map_err(|e| AppError::new(2, format!("{}: {e}", path.display())))?;

    debug!(
        path = %path.display(),
        product = %request.classification.product_name,
        "request loaded"
    );
    Ok(request)
}
