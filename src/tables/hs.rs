//! HS chapter duty table.
//!
//! Chapter-level (first two digits) ad-valorem duty rates. These are coarse:
//! a chapter rate is a representative MFN rate for the chapter's common
//! consumer headings, not a tariff-line lookup.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hs2DutyEntry {
    pub chapter: &'static str,
    pub rate: f64,
    pub description: &'static str,
}

const fn entry(chapter: &'static str, rate: f64, description: &'static str) -> Hs2DutyEntry {
    Hs2DutyEntry {
        chapter,
        rate,
        description,
    }
}

pub const HS2_DUTIES: [Hs2DutyEntry; 32] = [
    entry("04", 0.064, "Dairy produce; eggs; honey"),
    entry("09", 0.0, "Coffee, tea, mate and spices"),
    entry("17", 0.056, "Sugars and sugar confectionery"),
    entry("18", 0.043, "Cocoa and cocoa preparations"),
    entry("19", 0.064, "Preparations of cereals; bakers' wares"),
    entry("20", 0.08, "Preparations of vegetables, fruit or nuts"),
    entry("21", 0.064, "Miscellaneous edible preparations"),
    entry("23", 0.0, "Residues from food industries; animal fodder"),
    entry("28", 0.037, "Inorganic chemicals"),
    entry("29", 0.055, "Organic chemicals"),
    entry("33", 0.0, "Essential oils; perfumery and cosmetics"),
    entry("34", 0.03, "Soap, washing and lubricating preparations"),
    entry("38", 0.05, "Miscellaneous chemical products"),
    entry("39", 0.053, "Plastics and articles thereof"),
    entry("42", 0.08, "Articles of leather; handbags and travel goods"),
    entry("48", 0.0, "Paper and paperboard; articles thereof"),
    entry("61", 0.165, "Apparel, knitted or crocheted"),
    entry("62", 0.16, "Apparel, not knitted or crocheted"),
    entry("63", 0.07, "Other made up textile articles"),
    entry("64", 0.10, "Footwear"),
    entry("69", 0.06, "Ceramic products"),
    entry("70", 0.05, "Glass and glassware"),
    entry("71", 0.055, "Jewellery and precious metals"),
    entry("73", 0.034, "Articles of iron or steel"),
    entry("76", 0.05, "Aluminium and articles thereof"),
    entry("82", 0.04, "Tools and cutlery of base metal"),
    entry("84", 0.025, "Machinery and mechanical appliances"),
    entry("85", 0.02, "Electrical machinery and equipment"),
    entry("87", 0.025, "Vehicles and parts"),
    entry("94", 0.0, "Furniture; bedding; lamps"),
    entry("95", 0.0, "Toys, games and sports requisites"),
    entry("96", 0.04, "Miscellaneous manufactured articles"),
];

/// Duty entry for a two-digit chapter, if the chapter is tabulated.
pub fn hs2_duty(chapter: &str) -> Option<&'static Hs2DutyEntry> {
    HS2_DUTIES.iter().find(|e| e.chapter == chapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knitted_apparel_chapter() {
        let e = hs2_duty("61").unwrap();
        assert_eq!(e.rate, 0.165);
    }

    #[test]
    fn toys_are_duty_free() {
        assert_eq!(hs2_duty("95").unwrap().rate, 0.0);
    }

    #[test]
    fn unknown_chapter_is_absent() {
        assert!(hs2_duty("99").is_none());
        assert!(hs2_duty("6").is_none());
    }

    #[test]
    fn chapters_are_unique_two_digit_codes() {
        for (i, a) in HS2_DUTIES.iter().enumerate() {
            assert_eq!(a.chapter.len(), 2);
            assert!(a.chapter.chars().all(|c| c.is_ascii_digit()));
            for b in &HS2_DUTIES[i + 1..] {
                assert_ne!(a.chapter, b.chapter);
            }
        }
    }
}
