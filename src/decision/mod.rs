//! Decision support derived from a finished cost range.
//!
//! `build_decision_support` never looks at the field resolvers. It reads the
//! standard/conservative scenarios, the caller's evidence summary and an
//! optional retail price, and produces display-ready numbers:
//!
//! - HS candidates (market or canned fallback) and a hybrid rule when needed
//! - a duty-rate band
//! - landed cost per unit as min/mid/max over the two scenarios
//! - quantity totals, break-even and target-margin prices
//! - profit projections when a retail price is known
//! - blockers, never empty

pub mod hs;
pub mod planner;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::CostRange;
use crate::domain::{EvidenceLevel, HsCodeCandidate};

pub use hs::{
    hybrid_decision_rule, resolve_hs_candidates, CandidateSource, DecisionHsCandidate,
    HybridDecisionRule,
};
pub use planner::{
    margin_targets, profit_projection, quantity_plans, MarginTarget, MinMidMax, ProfitProjection,
    QuantityPlan,
};

const DUTY_BAND_FLOOR: f64 = 0.02;
const DUTY_BAND_CEILING: f64 = 0.35;
const NO_SIGNAL_DUTY_BAND: (f64, f64) = (0.0, 0.10);

/// Everything the decision builder consumes.
#[derive(Debug, Clone)]
pub struct DecisionParams<'a> {
    pub cost_range: &'a CostRange,
    pub evidence_level: EvidenceLevel,
    pub similar_records: u32,
    pub retail_price: Option<f64>,
    pub category: &'a str,
    pub supplier_matches: u32,
    pub hs_candidates: &'a [HsCodeCandidate],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_evidence(level: EvidenceLevel) -> Self {
        match level {
            EvidenceLevel::VerifiedQuote | EvidenceLevel::ExactImport => Self::High,
            EvidenceLevel::SimilarImport => Self::Medium,
            EvidenceLevel::CategoryBaseline => Self::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyBand {
    pub low: f64,
    pub high: f64,
    pub has_signal: bool,
    pub note: String,
}

/// Per-unit cost components, each reduced over the two scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandedCostPerUnit {
    pub factory_price: MinMidMax,
    pub shipping: MinMidMax,
    pub duty: MinMidMax,
    pub fees: MinMidMax,
    pub landed: MinMidMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerKind {
    MissingRetailPrice,
    NoMarketHsCandidates,
    LowConfidence,
    NoSupplierMatches,
    AllConfirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blocker {
    pub kind: BlockerKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSupport {
    pub hs_candidates: Vec<DecisionHsCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hybrid_rule: Option<HybridDecisionRule>,
    pub duty_band: DutyBand,
    pub landed_cost_per_unit: LandedCostPerUnit,
    pub confidence_tier: ConfidenceTier,
    pub similar_records: u32,
    pub supplier_matches: u32,
    pub quantity_plans: Vec<QuantityPlan>,
    pub break_even: MinMidMax,
    pub margin_targets: Vec<MarginTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<ProfitProjection>,
    pub blockers: Vec<Blocker>,
}

pub fn build_decision_support(params: &DecisionParams<'_>) -> DecisionSupport {
    let hs_candidates = resolve_hs_candidates(params.category, params.hs_candidates);
    let hybrid_rule = hybrid_decision_rule(params.category, &hs_candidates);
    let duty_band = duty_band(params.cost_range);
    let landed_cost_per_unit = landed_cost_per_unit(params.cost_range);
    let confidence_tier = ConfidenceTier::from_evidence(params.evidence_level);

    let landed = landed_cost_per_unit.landed;
    let retail_price = params.retail_price.filter(|p| p.is_finite() && *p > 0.0);
    let profit = retail_price.map(|p| profit_projection(landed, p));
    let quantity_plans = quantity_plans(landed, profit.as_ref());

    let blockers = blockers(params, retail_price.is_some(), confidence_tier);
    debug!(
        tier = confidence_tier.as_str(),
        candidates = hs_candidates.len(),
        blockers = blockers.len(),
        "decision support built"
    );

    DecisionSupport {
        hs_candidates,
        hybrid_rule,
        duty_band,
        landed_cost_per_unit,
        confidence_tier,
        similar_records: params.similar_records,
        supplier_matches: params.supplier_matches,
        quantity_plans,
        break_even: landed,
        margin_targets: margin_targets(landed),
        profit,
        blockers,
    }
}

fn landed_cost_per_unit(range: &CostRange) -> LandedCostPerUnit {
    let (a, b) = (&range.standard, &range.conservative);
    LandedCostPerUnit {
        factory_price: MinMidMax::from_pair(a.factory_price, b.factory_price),
        shipping: MinMidMax::from_pair(a.shipping, b.shipping),
        duty: MinMidMax::from_pair(a.duty, b.duty),
        fees: MinMidMax::from_pair(a.fees, b.fees),
        landed: MinMidMax::from_pair(a.landed, b.landed),
    }
}

fn duty_band(range: &CostRange) -> DutyBand {
    let scenarios = [&range.standard, &range.conservative];
    if scenarios.iter().all(|s| s.duty == 0.0) {
        let (low, high) = NO_SIGNAL_DUTY_BAND;
        return DutyBand {
            low,
            high,
            has_signal: false,
            note: "No duty signal yet; confirm the HS code before relying on duty.".to_string(),
        };
    }

    let implied = scenarios.map(|s| {
        if s.factory_price > 0.0 {
            s.duty / s.factory_price
        } else {
            0.0
        }
    });
    let bound = |r: f64| r.clamp(DUTY_BAND_FLOOR, DUTY_BAND_CEILING);
    DutyBand {
        low: bound(implied[0].min(implied[1])),
        high: bound(implied[0].max(implied[1])),
        has_signal: true,
        note: "Implied by the duty carried in the cost scenarios.".to_string(),
    }
}

fn blockers(params: &DecisionParams<'_>, has_retail: bool, tier: ConfidenceTier) -> Vec<Blocker> {
    let mut out = Vec::new();
    let mut push = |kind, message: String| out.push(Blocker { kind, message });

    if !has_retail {
        push(
            BlockerKind::MissingRetailPrice,
            "No retail price; profit and margin cannot be projected.".to_string(),
        );
    }
    if params.hs_candidates.is_empty() {
        push(
            BlockerKind::NoMarketHsCandidates,
            "No market HS candidates; classification unconfirmed.".to_string(),
        );
    }
    if tier == ConfidenceTier::Low {
        push(
            BlockerKind::LowConfidence,
            format!(
                "Costs rest on category baselines ({} similar import records).",
                params.similar_records
            ),
        );
    }
    if params.supplier_matches == 0 {
        push(
            BlockerKind::NoSupplierMatches,
            "No matching suppliers found; factory price is unverified.".to_string(),
        );
    }

    if out.is_empty() {
        out.push(Blocker {
            kind: BlockerKind::AllConfirmed,
            message: "All key inputs confirmed.".to_string(),
        });
    }
    out
}
