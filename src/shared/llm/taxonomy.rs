use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed taxonomy for incident classification.
///
/// Stored in the database as the short code string (DEF, POL, ...). The
/// `Irrelevant` sentinel never reaches storage: reports classified as
/// irrelevant are discarded before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum Category {
    #[serde(rename = "DEF")]
    #[sqlx(rename = "DEF")]
    Deforestation,

    #[serde(rename = "POL")]
    #[sqlx(rename = "POL")]
    Pollution,

    #[serde(rename = "ENC")]
    #[sqlx(rename = "ENC")]
    Encroachment,

    #[serde(rename = "ECO")]
    #[sqlx(rename = "ECO")]
    EcologicalStress,

    #[serde(rename = "OTH")]
    #[sqlx(rename = "OTH")]
    Other,

    #[serde(rename = "NOT_RELEVANT")]
    #[sqlx(rename = "NOT_RELEVANT")]
    Irrelevant,
}

impl Category {
    pub fn code(self) -> &'static str {
        match self {
            Category::Deforestation => "DEF",
            Category::Pollution => "POL",
            Category::Encroachment => "ENC",
            Category::EcologicalStress => "ECO",
            Category::Other => "OTH",
            Category::Irrelevant => "NOT_RELEVANT",
        }
    }

    pub fn is_irrelevant(self) -> bool {
        self == Category::Irrelevant
    }

    /// Map a free-form model label to a canonical category.
    ///
    /// Total over all strings: unrecognized input degrades to `Irrelevant`
    /// rather than fabricating a substantive category. The keyword pass is a
    /// deliberately lossy safety net against model output drift, checked in
    /// priority order so that e.g. "burning" lands on deforestation before
    /// the fire keyword can claim it for "other".
    pub fn normalize(raw: &str) -> Category {
        let v = raw.trim().to_uppercase().replace('-', "_");
        if v.is_empty() {
            return Category::Irrelevant;
        }

        // Direct codes
        match v.as_str() {
            "DEF" => return Category::Deforestation,
            "POL" => return Category::Pollution,
            "ENC" => return Category::Encroachment,
            "ECO" => return Category::EcologicalStress,
            "OTH" => return Category::Other,
            "NOT_RELEVANT" | "NOTRELEVANT" | "NOT RELEVANT" | "IRRELEVANT" => {
                return Category::Irrelevant
            }
            _ => {}
        }

        // Common words -> codes
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| v.contains(k));

        if contains_any(&["DEFOR", "BURN", "LOG"]) {
            Category::Deforestation
        } else if contains_any(&["POLLUT", "WASTE", "SEWAGE", "OIL"]) {
            Category::Pollution
        } else if contains_any(&["ENCROACH", "CONSTRUCT", "LANDFILL", "AQUACULTURE"]) {
            Category::Encroachment
        } else if contains_any(&["ECO", "STRESS", "PEST", "ALGA", "DIE"]) {
            Category::EcologicalStress
        } else if contains_any(&["OTHER", "UNSPECIFIED", "POACH", "FIRE"]) {
            Category::Other
        } else {
            Category::Irrelevant
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_direct_codes() {
        assert_eq!(Category::normalize("DEF"), Category::Deforestation);
        assert_eq!(Category::normalize("POL"), Category::Pollution);
        assert_eq!(Category::normalize("ENC"), Category::Encroachment);
        assert_eq!(Category::normalize("ECO"), Category::EcologicalStress);
        assert_eq!(Category::normalize("OTH"), Category::Other);
    }

    #[test]
    fn test_normalize_case_and_hyphens() {
        assert_eq!(Category::normalize("def"), Category::Deforestation);
        assert_eq!(Category::normalize("  pol  "), Category::Pollution);
        assert_eq!(Category::normalize("not-relevant"), Category::Irrelevant);
        assert_eq!(Category::normalize("Not_Relevant"), Category::Irrelevant);
    }

    #[test]
    fn test_normalize_empty_is_irrelevant() {
        assert_eq!(Category::normalize(""), Category::Irrelevant);
        assert_eq!(Category::normalize("   "), Category::Irrelevant);
    }

    #[test]
    fn test_normalize_keyword_containment() {
        assert_eq!(Category::normalize("deforestation"), Category::Deforestation);
        assert_eq!(Category::normalize("illegal logging"), Category::Deforestation);
        assert_eq!(Category::normalize("burning of trees"), Category::Deforestation);
        assert_eq!(Category::normalize("oil spill"), Category::Pollution);
        assert_eq!(Category::normalize("sewage discharge"), Category::Pollution);
        assert_eq!(Category::normalize("new construction"), Category::Encroachment);
        assert_eq!(Category::normalize("aquaculture pond"), Category::Encroachment);
        assert_eq!(Category::normalize("algal bloom"), Category::EcologicalStress);
        assert_eq!(Category::normalize("mass die-off"), Category::EcologicalStress);
        assert_eq!(Category::normalize("poaching"), Category::Other);
        assert_eq!(Category::normalize("fire damage"), Category::Other);
    }

    #[test]
    fn test_normalize_unrecognized_is_irrelevant() {
        assert_eq!(Category::normalize("a sunny beach"), Category::Irrelevant);
        assert_eq!(Category::normalize("qwerty"), Category::Irrelevant);
        assert_eq!(Category::normalize("\u{1F30A}\u{0000}xyz"), Category::Irrelevant);
    }

    #[test]
    fn test_normalize_is_idempotent_over_codes() {
        for code in ["DEF", "POL", "ENC", "ECO", "OTH", "NOT_RELEVANT"] {
            let first = Category::normalize(code);
            assert_eq!(Category::normalize(first.code()), first);
        }
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Category::Deforestation).unwrap();
        assert_eq!(json, "\"DEF\"");
        let back: Category = serde_json::from_str("\"NOT_RELEVANT\"").unwrap();
        assert_eq!(back, Category::Irrelevant);
    }
}
