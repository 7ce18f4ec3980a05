//! HS classification candidates for the decision view.
//!
//! Market candidates win when present. Otherwise a canned per-category table
//! supplies one or two low-confidence starting points, and anything the table
//! does not know gets a single generic placeholder.

use serde::{Deserialize, Serialize};

use crate::domain::{CategoryKey, HsCodeCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateSource {
    Market,
    Fallback,
}

/// HS candidate as shown to the user; confidence is on a 0..=100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionHsCandidate {
    pub code: String,
    pub description: String,
    pub confidence: f64,
    pub source: CandidateSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsPath {
    pub code: String,
    pub description: String,
}

/// Two defensible classifications for a dual-natured product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridDecisionRule {
    pub primary: HsPath,
    pub alternate: HsPath,
    pub guidance: String,
}

struct FallbackSeed {
    code: &'static str,
    description: &'static str,
    confidence: f64,
}

const fn seed(code: &'static str, description: &'static str, confidence: f64) -> FallbackSeed {
    FallbackSeed {
        code,
        description,
        confidence,
    }
}

const PLACEHOLDER_CONFIDENCE: f64 = 10.0;

// Chemical and industrial parts span too many chapters for a canned guess.
const FALLBACK_CANDIDATES: &[(CategoryKey, &[FallbackSeed])] = &[
    (
        CategoryKey::Toy,
        &[
            seed("9503.00", "Toys, scale models, puzzles", 35.0),
            seed("9504.90", "Table and parlour games", 25.0),
        ],
    ),
    (
        CategoryKey::Food,
        &[
            seed("1704.90", "Sugar confectionery, no cocoa", 30.0),
            seed("2106.90", "Food preparations n.e.s.", 25.0),
        ],
    ),
    (
        CategoryKey::Hybrid,
        &[
            seed("1704.90", "Sugar confectionery, no cocoa", 30.0),
            seed("9503.00", "Toys, scale models, puzzles", 30.0),
        ],
    ),
    (
        CategoryKey::Electronics,
        &[
            seed("8517.62", "Data transmission apparatus", 30.0),
            seed("8543.70", "Electrical machines n.e.s.", 25.0),
        ],
    ),
    (
        CategoryKey::Apparel,
        &[
            seed("6109.10", "T-shirts, knitted, cotton", 30.0),
            seed("6205.20", "Shirts, woven, cotton", 25.0),
        ],
    ),
    (
        CategoryKey::Beauty,
        &[seed("3304.99", "Beauty and skin-care preparations", 30.0)],
    ),
    (
        CategoryKey::HomeKitchen,
        &[
            seed("3924.10", "Plastic tableware and kitchenware", 30.0),
            seed("7323.93", "Stainless steel household articles", 25.0),
        ],
    ),
    (
        CategoryKey::Furniture,
        &[seed("9403.60", "Wooden furniture n.e.s.", 30.0)],
    ),
    (
        CategoryKey::Hardware,
        &[
            seed("8205.59", "Hand tools n.e.s.", 30.0),
            seed("7318.15", "Threaded bolts and screws", 25.0),
        ],
    ),
    (
        CategoryKey::Packaging,
        &[
            seed("4819.10", "Corrugated paper cartons", 30.0),
            seed("3923.21", "Sacks and bags of ethylene polymers", 25.0),
        ],
    ),
    (
        CategoryKey::JewelryAccessories,
        &[seed("7117.19", "Imitation jewellery, base metal", 30.0)],
    ),
    (
        CategoryKey::StationeryOffice,
        &[
            seed("4820.10", "Notebooks, diaries and pads", 30.0),
            seed("9608.10", "Ball point pens", 25.0),
        ],
    ),
    (
        CategoryKey::Pet,
        &[
            seed("4201.00", "Saddlery and harness for animals", 30.0),
            seed("2309.90", "Animal feed preparations", 25.0),
        ],
    ),
];

fn fallback_seeds(category: &str) -> Option<&'static [FallbackSeed]> {
    let key = CategoryKey::parse(category)?;
    FALLBACK_CANDIDATES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, seeds)| *seeds)
}

/// Candidates for display, highest confidence first.
pub fn resolve_hs_candidates(
    category: &str,
    market: &[HsCodeCandidate],
) -> Vec<DecisionHsCandidate> {
    if !market.is_empty() {
        let mut out: Vec<DecisionHsCandidate> = market
            .iter()
            .map(|c| DecisionHsCandidate {
                code: c.code.clone(),
                description: c.rationale.clone(),
                confidence: (c.confidence * 100.0).clamp(0.0, 100.0),
                source: CandidateSource::Market,
            })
            .collect();
        out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        return out;
    }

    match fallback_seeds(category) {
        Some(seeds) => seeds
            .iter()
            .map(|s| DecisionHsCandidate {
                code: s.code.to_string(),
                description: s.description.to_string(),
                confidence: s.confidence,
                source: CandidateSource::Fallback,
            })
            .collect(),
        None => vec![DecisionHsCandidate {
            code: "0000.00".to_string(),
            description: "Unclassified; needs a customs broker review".to_string(),
            confidence: PLACEHOLDER_CONFIDENCE,
            source: CandidateSource::Fallback,
        }],
    }
}

pub fn hybrid_decision_rule(
    category: &str,
    candidates: &[DecisionHsCandidate],
) -> Option<HybridDecisionRule> {
    if CategoryKey::parse(category) != Some(CategoryKey::Hybrid) {
        return None;
    }
    let [first, second, ..] = candidates else {
        return None;
    };

    let path = |c: &DecisionHsCandidate| HsPath {
        code: c.code.clone(),
        description: c.description.clone(),
    };

    Some(HybridDecisionRule {
        primary: path(first),
        alternate: path(second),
        guidance: format!(
            "Use {} when the consumable part gives the product its essential character \
             (sold by weight, the novelty is packaging). Use {} when the non-consumable part \
             has play or use value of its own. Get a binding ruling before the first shipment.",
            first.code, second.code
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(code: &str, confidence: f64) -> HsCodeCandidate {
        HsCodeCandidate {
            code: code.to_string(),
            confidence,
            rationale: String::new(),
        }
    }

    #[test]
    fn market_candidates_scaled_and_sorted() {
        let out = resolve_hs_candidates("toy", &[market("9504.90", 0.4), market("9503.00", 0.72)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].code, "9503.00");
        assert!((out[0].confidence - 72.0).abs() < 1e-9);
        assert!(out.iter().all(|c| c.source == CandidateSource::Market));
    }

    #[test]
    fn fallback_table_has_low_confidence() {
        for key in CategoryKey::ALL {
            let out = resolve_hs_candidates(key.as_str(), &[]);
            assert!((1..=2).contains(&out.len()), "{key:?}");
            for c in &out {
                assert_eq!(c.source, CandidateSource::Fallback);
                assert!(c.confidence <= 35.0);
            }
        }
    }

    #[test]
    fn unknown_category_gets_placeholder() {
        let out = resolve_hs_candidates("spaceships", &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence, PLACEHOLDER_CONFIDENCE);

        let out = resolve_hs_candidates("industrial_parts", &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, "0000.00");
    }

    #[test]
    fn hybrid_rule_needs_two_candidates() {
        let two = resolve_hs_candidates("hybrid", &[]);
        let rule = hybrid_decision_rule("hybrid", &two).unwrap();
        assert_eq!(rule.primary.code, "1704.90");
        assert_eq!(rule.alternate.code, "9503.00");
        assert!(rule.guidance.contains("1704.90"));

        assert!(hybrid_decision_rule("hybrid", &two[..1]).is_none());
        assert!(hybrid_decision_rule("toy", &two).is_none());
    }
}
