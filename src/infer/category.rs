//! Category and HS chapter resolution.
//!
//! Category selection is an ordered list of rules; the first rule that yields a
//! key wins:
//!
//! 1. classifier category name (exact key or known alias)
//! 2. keyword vocabulary intersection (hybrid check first)
//! 3. HS chapter hint
//! 4. the same vocabularies over product name + description
//! 5. `CategoryKey::DEFAULT`

use std::collections::HashSet;

use crate::domain::{normalize_key, CategoryKey, CategoryMatch, CategoryRule, Classification, MarketEstimate};

/// The classifier signals category selection looks at.
#[derive(Debug, Clone, Copy)]
pub struct CategorySignals<'a> {
    pub category: &'a str,
    pub keywords: &'a [String],
    /// Full HS code or bare chapter; only the first two digits are used.
    pub hs_code: Option<&'a str>,
    pub product_name: &'a str,
    pub description: &'a str,
}

impl<'a> CategorySignals<'a> {
    pub fn from_classification(c: &'a Classification) -> Self {
        Self {
            category: &c.category,
            keywords: &c.keywords,
            hs_code: c.hs_code.as_deref(),
            product_name: &c.product_name,
            description: &c.description,
        }
    }
}

/// Classifier category names that are not literal keys.
const CATEGORY_ALIASES: &[(&str, CategoryKey)] = &[
    ("toys", CategoryKey::Toy),
    ("toys_games", CategoryKey::Toy),
    ("games", CategoryKey::Toy),
    ("snacks", CategoryKey::Food),
    ("food_beverage", CategoryKey::Food),
    ("grocery", CategoryKey::Food),
    ("confectionery", CategoryKey::Food),
    ("candy_toy", CategoryKey::Hybrid),
    ("novelty_candy", CategoryKey::Hybrid),
    ("consumer_electronics", CategoryKey::Electronics),
    ("clothing", CategoryKey::Apparel),
    ("fashion", CategoryKey::Apparel),
    ("cosmetics", CategoryKey::Beauty),
    ("personal_care", CategoryKey::Beauty),
    ("kitchen", CategoryKey::HomeKitchen),
    ("home", CategoryKey::HomeKitchen),
    ("housewares", CategoryKey::HomeKitchen),
    ("tools", CategoryKey::Hardware),
    ("chemicals", CategoryKey::Chemical),
    ("industrial", CategoryKey::IndustrialParts),
    ("jewelry", CategoryKey::JewelryAccessories),
    ("accessories", CategoryKey::JewelryAccessories),
    ("stationery", CategoryKey::StationeryOffice),
    ("office", CategoryKey::StationeryOffice),
    ("office_supplies", CategoryKey::StationeryOffice),
    ("pets", CategoryKey::Pet),
    ("pet_supplies", CategoryKey::Pet),
];

const TOY_WORDS: &[&str] = &[
    "toy", "toys", "plush", "doll", "dolls", "figure", "figurine", "puzzle", "blocks", "stuffed",
    "teddy", "game", "rc",
];

const FOOD_WORDS: &[&str] = &[
    "food", "candy", "candies", "snack", "snacks", "chocolate", "gummy", "gummies", "lollipop",
    "cookie", "cookies", "biscuit", "confectionery", "tea", "coffee", "sauce", "spice", "noodle",
    "noodles",
];

/// Keyword vocabularies in match order. Hybrid is checked separately, before these.
const VOCABULARIES: &[(CategoryKey, &[&str])] = &[
    (
        CategoryKey::Pet,
        &["pet", "pets", "dog", "cat", "leash", "collar", "litter", "aquarium", "kennel"],
    ),
    (
        CategoryKey::Electronics,
        &[
            "electronic", "electronics", "charger", "cable", "usb", "bluetooth", "earbuds",
            "headphones", "speaker", "led", "battery", "smartwatch", "phone",
        ],
    ),
    (
        CategoryKey::Apparel,
        &[
            "apparel", "clothing", "shirt", "tshirt", "hoodie", "dress", "jacket", "socks",
            "pants", "jeans", "sweater", "knitwear",
        ],
    ),
    (
        CategoryKey::Beauty,
        &[
            "beauty", "cosmetic", "cosmetics", "lipstick", "mascara", "serum", "skincare",
            "lotion", "shampoo", "perfume", "makeup",
        ],
    ),
    (
        CategoryKey::JewelryAccessories,
        &[
            "jewelry", "jewellery", "necklace", "bracelet", "ring", "earring", "earrings",
            "pendant", "handbag", "wallet", "sunglasses",
        ],
    ),
    (
        CategoryKey::Furniture,
        &["furniture", "chair", "table", "sofa", "desk", "shelf", "cabinet", "stool", "wardrobe"],
    ),
    (
        CategoryKey::HomeKitchen,
        &[
            "kitchen", "cookware", "pan", "pot", "mug", "cup", "plate", "utensil", "spatula",
            "towel", "bottle", "storage", "decor",
        ],
    ),
    (
        CategoryKey::Hardware,
        &[
            "hardware", "screw", "screws", "bolt", "bolts", "drill", "wrench", "hammer", "tool",
            "tools", "hinge", "pliers", "screwdriver",
        ],
    ),
    (
        CategoryKey::Chemical,
        &[
            "chemical", "chemicals", "solvent", "adhesive", "glue", "resin", "paint", "detergent",
            "reagent",
        ],
    ),
    (
        CategoryKey::IndustrialParts,
        &[
            "bearing", "bearings", "valve", "gear", "pump", "motor", "gasket", "fitting", "sensor",
            "actuator", "hydraulic",
        ],
    ),
    (
        CategoryKey::Packaging,
        &["packaging", "mailer", "carton", "pouch", "envelope", "wrap", "tape", "labels"],
    ),
    (
        CategoryKey::StationeryOffice,
        &[
            "stationery", "pen", "pens", "pencil", "notebook", "marker", "stapler", "eraser",
            "folder", "sticker", "stickers",
        ],
    ),
    (CategoryKey::Toy, TOY_WORDS),
    (CategoryKey::Food, FOOD_WORDS),
];

/// HS chapter to category hints.
const HS_CATEGORY_HINTS: &[(&str, CategoryKey)] = &[
    ("04", CategoryKey::Food),
    ("09", CategoryKey::Food),
    ("17", CategoryKey::Food),
    ("18", CategoryKey::Food),
    ("19", CategoryKey::Food),
    ("20", CategoryKey::Food),
    ("21", CategoryKey::Food),
    ("23", CategoryKey::Pet),
    ("28", CategoryKey::Chemical),
    ("29", CategoryKey::Chemical),
    ("33", CategoryKey::Beauty),
    ("34", CategoryKey::Beauty),
    ("38", CategoryKey::Chemical),
    ("39", CategoryKey::Packaging),
    ("42", CategoryKey::JewelryAccessories),
    ("48", CategoryKey::StationeryOffice),
    ("61", CategoryKey::Apparel),
    ("62", CategoryKey::Apparel),
    ("63", CategoryKey::Apparel),
    ("64", CategoryKey::Apparel),
    ("69", CategoryKey::HomeKitchen),
    ("70", CategoryKey::HomeKitchen),
    ("71", CategoryKey::JewelryAccessories),
    ("73", CategoryKey::HomeKitchen),
    ("76", CategoryKey::HomeKitchen),
    ("82", CategoryKey::Hardware),
    ("84", CategoryKey::IndustrialParts),
    ("85", CategoryKey::Electronics),
    ("87", CategoryKey::IndustrialParts),
    ("94", CategoryKey::Furniture),
    ("95", CategoryKey::Toy),
    ("96", CategoryKey::StationeryOffice),
];

/// Pick a category and report which rule matched. Always returns a key.
pub fn determine_category(signals: &CategorySignals<'_>) -> CategoryMatch {
    let rules: [(CategoryRule, &dyn Fn() -> Option<CategoryKey>); 4] = [
        (CategoryRule::CategoryName, &|| match_category_name(signals.category)),
        (CategoryRule::Keywords, &|| {
            let tokens = tokenize(signals.keywords.iter().map(String::as_str));
            match_vocabulary(&tokens)
        }),
        (CategoryRule::HsChapter, &|| {
            let chapter = signals.hs_code.and_then(hs2_of)?;
            HS_CATEGORY_HINTS
                .iter()
                .find(|(ch, _)| *ch == chapter)
                .map(|(_, key)| *key)
        }),
        (CategoryRule::ProductText, &|| {
            let tokens = tokenize([signals.product_name, signals.description]);
            match_vocabulary(&tokens)
        }),
    ];

    for (rule, check) in rules {
        if let Some(key) = check() {
            let rule = match (rule, key) {
                (CategoryRule::Keywords, CategoryKey::Hybrid) => CategoryRule::HybridKeywords,
                _ => rule,
            };
            return CategoryMatch { key, rule };
        }
    }

    CategoryMatch {
        key: CategoryKey::DEFAULT,
        rule: CategoryRule::Default,
    }
}

pub fn determine_category_key(signals: &CategorySignals<'_>) -> CategoryKey {
    determine_category(signals).key
}

fn match_category_name(name: &str) -> Option<CategoryKey> {
    let normalized = normalize_key(name);
    if normalized.is_empty() {
        return None;
    }
    CategoryKey::parse(&normalized).or_else(|| {
        CATEGORY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, key)| *key)
    })
}

fn match_vocabulary(tokens: &HashSet<String>) -> Option<CategoryKey> {
    if tokens.is_empty() {
        return None;
    }
    let hits = |words: &[&str]| words.iter().any(|w| tokens.contains(*w));
    if hits(TOY_WORDS) && hits(FOOD_WORDS) {
        return Some(CategoryKey::Hybrid);
    }
    VOCABULARIES
        .iter()
        .find(|(_, words)| hits(*words))
        .map(|(key, _)| *key)
}

fn tokenize<'s>(texts: impl IntoIterator<Item = &'s str>) -> HashSet<String> {
    texts
        .into_iter()
        .flat_map(|t| t.split(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// First two digits of an HS code, ignoring dots/spaces. `None` if fewer than two.
pub fn hs2_of(code: &str) -> Option<String> {
    let digits: String = code.chars().filter(char::is_ascii_digit).take(2).collect();
    (digits.len() == 2).then_some(digits)
}

/// HS chapter for an estimate: the classifier's own code first, then the
/// highest-confidence market candidate with a usable code.
pub fn extract_hs2(classification: &Classification, market: Option<&MarketEstimate>) -> Option<String> {
    if let Some(ch) = classification.hs_code.as_deref().and_then(hs2_of) {
        return Some(ch);
    }
    let market = market?;
    let mut candidates: Vec<_> = market.hs_code_candidates.iter().collect();
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.into_iter().find_map(|c| hs2_of(&c.code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HsCodeCandidate;

    fn classification(category: &str, keywords: &[&str], hs: Option<&str>, name: &str) -> Classification {
        Classification {
            product_name: name.to_string(),
            category: category.to_string(),
            hs_code: hs.map(str::to_string),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Classification::default()
        }
    }

    fn pick(c: &Classification) -> CategoryMatch {
        determine_category(&CategorySignals::from_classification(c))
    }

    #[test]
    fn category_name_wins_over_keywords() {
        let c = classification("Toys", &["chocolate"], None, "Bear");
        assert_eq!(pick(&c), CategoryMatch { key: CategoryKey::Toy, rule: CategoryRule::CategoryName });
    }

    #[test]
    fn toy_and_food_keywords_make_hybrid() {
        let c = classification("novelty", &["Candy", "toy car"], None, "Candy car");
        let m = pick(&c);
        assert_eq!(m.key, CategoryKey::Hybrid);
        assert_eq!(m.rule, CategoryRule::HybridKeywords);
    }

    #[test]
    fn keyword_order_is_first_match() {
        // "dog" (pet) precedes "cookie" (food) in vocabulary order.
        let c = classification("", &["cookie", "dog"], None, "");
        assert_eq!(pick(&c).key, CategoryKey::Pet);
    }

    #[test]
    fn hs_hint_used_without_name_or_keywords() {
        let c = classification("misc", &[], Some("6109.10"), "Item");
        assert_eq!(pick(&c), CategoryMatch { key: CategoryKey::Apparel, rule: CategoryRule::HsChapter });
    }

    #[test]
    fn product_text_fallback() {
        let c = classification("", &[], None, "Stainless steel cookware set");
        assert_eq!(pick(&c), CategoryMatch { key: CategoryKey::HomeKitchen, rule: CategoryRule::ProductText });
        let c = classification("", &[], None, "USB-C charger");
        assert_eq!(pick(&c).key, CategoryKey::Electronics);
    }

    #[test]
    fn no_signal_defaults() {
        let c = classification("", &[], Some("x"), "Thing");
        assert_eq!(pick(&c), CategoryMatch { key: CategoryKey::DEFAULT, rule: CategoryRule::Default });
        assert_eq!(determine_category_key(&CategorySignals::from_classification(&c)), CategoryKey::HomeKitchen);
    }

    #[test]
    fn hs2_strips_punctuation_and_rejects_short_codes() {
        assert_eq!(hs2_of("95.03"), Some("95".to_string()));
        assert_eq!(hs2_of(" 6 1 09"), Some("61".to_string()));
        assert_eq!(hs2_of("9"), None);
        assert_eq!(hs2_of("n/a"), None);
    }

    #[test]
    fn extract_hs2_prefers_classification_then_top_candidate() {
        let market = MarketEstimate {
            hs_code_candidates: vec![
                HsCodeCandidate { code: "1704.90".into(), confidence: 0.4, rationale: String::new() },
                HsCodeCandidate { code: "9503.00".into(), confidence: 0.7, rationale: String::new() },
                HsCodeCandidate { code: "?".into(), confidence: 0.9, rationale: String::new() },
            ],
            observed_suppliers: vec![],
        };

        let own = classification("", &[], Some("6109"), "");
        assert_eq!(extract_hs2(&own, Some(&market)), Some("61".to_string()));

        let malformed = classification("", &[], Some("6"), "");
        assert_eq!(extract_hs2(&malformed, Some(&market)), Some("95".to_string()));

        let none = classification("", &[], None, "");
        assert_eq!(extract_hs2(&none, None), None);
    }
}
