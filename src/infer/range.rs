//! Confidence bands and p10/p50/p90 construction.
//!
//! `build_range` is the only place range width is decided. Resolvers never pick
//! a spread themselves; combinators apply their rule percentile by percentile to
//! ranges that came out of here.

use serde::{Deserialize, Serialize};

use crate::domain::RangeTriple;

/// Coarse confidence bucket with its relative spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= 80 {
            ConfidenceBand::High
        } else if confidence >= 60 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// Relative half-width applied around the value.
    pub fn spread(self) -> f64 {
        match self {
            ConfidenceBand::High => 0.08,
            ConfidenceBand::Medium => 0.18,
            ConfidenceBand::Low => 0.35,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

/// Symmetric proportional range around `value`, clamped at `floor`.
pub fn build_range(value: f64, confidence: u8, floor: f64) -> RangeTriple {
    let spread = ConfidenceBand::from_confidence(confidence).spread();
    let base = value.max(floor);
    RangeTriple {
        p10: (base * (1.0 - spread)).max(floor),
        p50: base,
        p90: (base * (1.0 + spread)).max(floor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ConfidenceBand::from_confidence(100), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(80), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(79), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(60), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(59), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(0), ConfidenceBand::Low);
    }

    #[test]
    fn higher_confidence_is_tighter() {
        let tight = build_range(100.0, 85, 0.0);
        let wide = build_range(100.0, 40, 0.0);
        assert!((tight.p10 - 92.0).abs() < 1e-9);
        assert!((tight.p90 - 108.0).abs() < 1e-9);
        assert!((wide.p10 - 65.0).abs() < 1e-9);
        assert!((wide.p90 - 135.0).abs() < 1e-9);
        assert!(tight.p90 - tight.p10 < wide.p90 - wide.p10);
    }

    #[test]
    fn floor_clamps_all_percentiles() {
        let r = build_range(0.00005, 50, 0.0001);
        assert_eq!(r.p10, 0.0001);
        assert_eq!(r.p50, 0.0001);
        assert!(r.p90 >= 0.0001);
        assert!(r.is_ordered());

        let zero = build_range(0.0, 60, 0.0);
        assert_eq!(zero, RangeTriple::exact(0.0));
    }

    #[test]
    fn ranges_are_ordered_for_any_confidence() {
        for confidence in 0..=100u8 {
            let r = build_range(12.5, confidence, 0.0);
            assert!(r.is_ordered(), "confidence {confidence}: {r:?}");
        }
    }
}
