//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - classifier/market inputs and user overrides (`Classification`, `MarketEstimate`, `UserOverrides`)
//! - the inference result types (`InferredInput`, `InferredInputs`, `RangeTriple`)
//! - request/config types consumed by the pipeline (`EstimateRequest`, `EstimateConfig`)

pub mod types;

pub use types::*;
