//! Shared domain types.
//!
//! These types are intentionally kept plain and serializable so they can be:
//!
//! - read from request JSON produced by the upstream classifier
//! - passed by value through the inference and cost pipeline
//! - exported as part of the JSON report

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Closed set of product categories the cost priors are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    Toy,
    Food,
    Hybrid,
    Electronics,
    Apparel,
    Beauty,
    HomeKitchen,
    Furniture,
    Hardware,
    Chemical,
    Packaging,
    IndustrialParts,
    JewelryAccessories,
    StationeryOffice,
    Pet,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 15] = [
        CategoryKey::Toy,
        CategoryKey::Food,
        CategoryKey::Hybrid,
        CategoryKey::Electronics,
        CategoryKey::Apparel,
        CategoryKey::Beauty,
        CategoryKey::HomeKitchen,
        CategoryKey::Furniture,
        CategoryKey::Hardware,
        CategoryKey::Chemical,
        CategoryKey::Packaging,
        CategoryKey::IndustrialParts,
        CategoryKey::JewelryAccessories,
        CategoryKey::StationeryOffice,
        CategoryKey::Pet,
    ];

    /// Category used when no classification signal matches.
    pub const DEFAULT: CategoryKey = CategoryKey::HomeKitchen;

    /// Stable snake_case key (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::Toy => "toy",
            CategoryKey::Food => "food",
            CategoryKey::Hybrid => "hybrid",
            CategoryKey::Electronics => "electronics",
            CategoryKey::Apparel => "apparel",
            CategoryKey::Beauty => "beauty",
            CategoryKey::HomeKitchen => "home_kitchen",
            CategoryKey::Furniture => "furniture",
            CategoryKey::Hardware => "hardware",
            CategoryKey::Chemical => "chemical",
            CategoryKey::Packaging => "packaging",
            CategoryKey::IndustrialParts => "industrial_parts",
            CategoryKey::JewelryAccessories => "jewelry_accessories",
            CategoryKey::StationeryOffice => "stationery_office",
            CategoryKey::Pet => "pet",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            CategoryKey::Toy => "Toys",
            CategoryKey::Food => "Food",
            CategoryKey::Hybrid => "Candy toy (hybrid)",
            CategoryKey::Electronics => "Electronics",
            CategoryKey::Apparel => "Apparel",
            CategoryKey::Beauty => "Beauty",
            CategoryKey::HomeKitchen => "Home & kitchen",
            CategoryKey::Furniture => "Furniture",
            CategoryKey::Hardware => "Hardware",
            CategoryKey::Chemical => "Chemicals",
            CategoryKey::Packaging => "Packaging",
            CategoryKey::IndustrialParts => "Industrial parts",
            CategoryKey::JewelryAccessories => "Jewelry & accessories",
            CategoryKey::StationeryOffice => "Stationery & office",
            CategoryKey::Pet => "Pet supplies",
        }
    }

    /// Parse a category key, tolerating case, spaces, `-` and `&`.
    ///
    /// `"Home & Kitchen"`, `"home-kitchen"` and `"home_kitchen"` all parse.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = normalize_key(s);
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
    }
}

/// Lowercase and collapse separators into single underscores.
pub(crate) fn normalize_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_sep = false;
    for ch in s.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// How a category key was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRule {
    CategoryName,
    HybridKeywords,
    Keywords,
    HsChapter,
    ProductText,
    Default,
}

impl CategoryRule {
    pub fn describe(self) -> &'static str {
        match self {
            CategoryRule::CategoryName => "classifier category name",
            CategoryRule::HybridKeywords => "keywords from both toy and food vocabularies",
            CategoryRule::Keywords => "classifier keywords",
            CategoryRule::HsChapter => "HS chapter hint",
            CategoryRule::ProductText => "product name/description text",
            CategoryRule::Default => "no matching signal (default category)",
        }
    }
}

/// A resolved category plus the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub key: CategoryKey,
    pub rule: CategoryRule,
}

/// Freight mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMode {
    Air,
    Ocean,
}

impl ShippingMode {
    pub fn display_name(self) -> &'static str {
        match self {
            ShippingMode::Air => "air",
            ShippingMode::Ocean => "ocean",
        }
    }
}

/// Where an inferred value came from, strongest first (`Ord` follows that order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceSource {
    User,
    Vision,
    Label,
    FromCustoms,
    FromHsEstimate,
    FromCategory,
    Assumed,
}

impl InferenceSource {
    pub fn as_str(self) -> &'static str {
        match self {
            InferenceSource::User => "user",
            InferenceSource::Vision => "vision",
            InferenceSource::Label => "label",
            InferenceSource::FromCustoms => "from_customs",
            InferenceSource::FromHsEstimate => "from_hs_estimate",
            InferenceSource::FromCategory => "from_category",
            InferenceSource::Assumed => "assumed",
        }
    }
}

/// The evidence behind an inferred value.
///
/// `InferredInput::source` is always derived from this, so the two cannot
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    UserOverride,
    LabelText { raw: String },
    VisionSignal { signal: String },
    CustomsRecord { reference: String },
    HsChapter { chapter: String, description: String },
    CategoryPrior { category: CategoryKey },
    Assumption { reason: String },
    /// Combination of other inferred fields; carries the weakest input's source.
    Derived {
        inputs: Vec<String>,
        weakest: InferenceSource,
    },
}

impl Provenance {
    pub fn source(&self) -> InferenceSource {
        match self {
            Provenance::UserOverride => InferenceSource::User,
            Provenance::LabelText { .. } => InferenceSource::Label,
            Provenance::VisionSignal { .. } => InferenceSource::Vision,
            Provenance::CustomsRecord { .. } => InferenceSource::FromCustoms,
            Provenance::HsChapter { .. } => InferenceSource::FromHsEstimate,
            Provenance::CategoryPrior { .. } => InferenceSource::FromCategory,
            Provenance::Assumption { .. } => InferenceSource::Assumed,
            Provenance::Derived { weakest, .. } => *weakest,
        }
    }
}

/// `p10 <= p50 <= p90`, all clamped to a per-field floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTriple {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

impl RangeTriple {
    /// Degenerate triple (no uncertainty).
    pub fn exact(value: f64) -> Self {
        Self {
            p10: value,
            p50: value,
            p90: value,
        }
    }

    /// Apply `f` to matching percentiles of `self` and `other`.
    ///
    /// Only monotone non-decreasing `f` keeps the result ordered.
    pub fn zip_with(self, other: RangeTriple, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            p10: f(self.p10, other.p10),
            p50: f(self.p50, other.p50),
            p90: f(self.p90, other.p90),
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.p10 <= self.p50 && self.p50 <= self.p90
    }

    pub fn is_degenerate(&self) -> bool {
        self.p10 == self.p50 && self.p50 == self.p90
    }
}

/// Highest confidence any non-user tier may report.
pub const MAX_INFERRED_CONFIDENCE: u8 = 95;

/// One resolved cost-model field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferredInput<T> {
    pub value: T,
    pub source: InferenceSource,
    /// 0..=100.
    pub confidence: u8,
    pub explanation: String,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeTriple>,
}

impl<T> InferredInput<T> {
    /// A value the caller pinned explicitly.
    pub fn user(value: T, explanation: impl Into<String>) -> Self {
        Self {
            value,
            source: InferenceSource::User,
            confidence: 100,
            explanation: explanation.into(),
            provenance: Provenance::UserOverride,
            range: None,
        }
    }

    /// A value inferred from evidence.
    ///
    /// Confidence is capped below the user level, except for derived values whose
    /// weakest input is itself a user override.
    pub fn inferred(
        value: T,
        provenance: Provenance,
        confidence: u8,
        explanation: impl Into<String>,
    ) -> Self {
        let source = provenance.source();
        let confidence = if source == InferenceSource::User {
            confidence.min(100)
        } else {
            confidence.min(MAX_INFERRED_CONFIDENCE)
        };
        Self {
            value,
            source,
            confidence,
            explanation: explanation.into(),
            provenance,
            range: None,
        }
    }

    pub fn with_range(mut self, range: RangeTriple) -> Self {
        self.range = Some(range);
        self
    }
}

impl InferredInput<f64> {
    /// The attached range, or a degenerate one around the value.
    pub fn range_or_exact(&self) -> RangeTriple {
        self.range.unwrap_or_else(|| RangeTriple::exact(self.value))
    }
}

/// Every resolved field for one estimate. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredInputs {
    pub category: CategoryMatch,
    pub hs2: Option<String>,
    pub shipping_mode: InferredInput<ShippingMode>,
    pub unit_weight_g: InferredInput<f64>,
    pub unit_volume_m3: InferredInput<f64>,
    pub carton_pack: InferredInput<u32>,
    pub billable_weight_kg: InferredInput<f64>,
    pub duty_rate: InferredInput<f64>,
    pub fees_per_unit: InferredInput<f64>,
    pub shipping_per_unit: InferredInput<f64>,
}

/// Label text extracted upstream (OCR / vision).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelData {
    #[serde(default)]
    pub net_weight: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
}

/// Output of the upstream photo classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub hs_code: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub label_data: Option<LabelData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HsCodeCandidate {
    pub code: String,
    /// 0..=1 as reported by the market estimate.
    pub confidence: f64,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedSupplier {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

/// Optional market lookup (import records, supplier listings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEstimate {
    #[serde(default)]
    pub hs_code_candidates: Vec<HsCodeCandidate>,
    #[serde(default)]
    pub observed_suppliers: Vec<ObservedSupplier>,
}

/// Values the caller pins explicitly. Validated at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverrides {
    #[serde(default)]
    pub shipping_mode: Option<ShippingMode>,
    #[serde(default)]
    pub unit_weight_g: Option<f64>,
    #[serde(default)]
    pub unit_volume_m3: Option<f64>,
    #[serde(default)]
    pub carton_pack: Option<u32>,
    #[serde(default)]
    pub duty_rate: Option<f64>,
}

/// How strong the market evidence behind a cost estimate is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum EvidenceLevel {
    VerifiedQuote,
    ExactImport,
    SimilarImport,
    #[default]
    CategoryBaseline,
}

/// Factory (ex-works) unit price quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactoryQuote {
    pub low: f64,
    pub high: f64,
}

impl FactoryQuote {
    pub fn typical(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// One estimate request as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub classification: Classification,
    #[serde(default)]
    pub market_estimate: Option<MarketEstimate>,
    #[serde(default)]
    pub overrides: UserOverrides,
    pub factory_price: FactoryQuote,
    #[serde(default)]
    pub retail_price: Option<f64>,
    #[serde(default)]
    pub evidence_level: EvidenceLevel,
    #[serde(default)]
    pub similar_records: u32,
    #[serde(default)]
    pub supplier_matches: Option<u32>,
}

impl EstimateRequest {
    /// Explicit supplier count, else the number of observed suppliers.
    pub fn supplier_match_count(&self) -> u32 {
        self.supplier_matches.unwrap_or_else(|| {
            self.market_estimate
                .as_ref()
                .map(|m| m.observed_suppliers.len() as u32)
                .unwrap_or(0)
        })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment defaults).
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    /// Fixed customs/brokerage charge per shipment, spread over the carton pack.
    pub entry_fee_per_shipment: f64,
    /// Retail price used when the request does not carry one.
    pub retail_price: Option<f64>,
    /// Forces a shipping mode on every request (overrides request overrides).
    pub shipping_mode: Option<ShippingMode>,
    /// Forces an evidence level on every request.
    pub evidence_level: Option<EvidenceLevel>,
    pub export_report: Option<PathBuf>,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            entry_fee_per_shipment: 35.0,
            retail_price: None,
            shipping_mode: None,
            evidence_level: None,
            export_report: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_tolerates_separators() {
        assert_eq!(CategoryKey::parse("Home & Kitchen"), Some(CategoryKey::HomeKitchen));
        assert_eq!(CategoryKey::parse("industrial-parts"), Some(CategoryKey::IndustrialParts));
        assert_eq!(CategoryKey::parse(" TOY "), Some(CategoryKey::Toy));
        assert_eq!(CategoryKey::parse("gadgets"), None);
    }

    #[test]
    fn provenance_drives_source() {
        let input = InferredInput::inferred(
            1.0,
            Provenance::CategoryPrior { category: CategoryKey::Toy },
            100,
            "prior",
        );
        assert_eq!(input.source, InferenceSource::FromCategory);
        assert_eq!(input.confidence, MAX_INFERRED_CONFIDENCE);

        let user = InferredInput::user(2.0, "pinned");
        assert_eq!(user.source, InferenceSource::User);
        assert_eq!(user.confidence, 100);
    }

    #[test]
    fn request_defaults_supplier_count_from_market() {
        let json = r#"{
            "classification": { "productName": "Plush bear" },
            "marketEstimate": { "observedSuppliers": [{ "name": "A" }, { "name": "B" }] },
            "factoryPrice": { "low": 1.0, "high": 2.0 }
        }"#;
        let req: EstimateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.supplier_match_count(), 2);
        assert_eq!(req.evidence_level, EvidenceLevel::CategoryBaseline);
        assert!(req.overrides.shipping_mode.is_none());
    }
}
