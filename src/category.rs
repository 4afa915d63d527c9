//! Category data model
//!
//! Records are owned by the persistence layer and read-only to the
//! matching core. Optional fields default to empty so partially-filled
//! records decode without faults.

use serde::{Deserialize, Serialize};

/// A node of the store-category taxonomy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    /// Primary matching target
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub name_en: String,
    /// Opaque classification code; not used in matching
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub search_key_words_ar: Vec<String>,
    #[serde(default)]
    pub search_key_words_en: Vec<String>,
    /// Lookup key into the same collection, not an ownership link
    #[serde(default)]
    pub parent_id: Option<u32>,
    #[serde(default)]
    pub description_ar: Option<String>,
    #[serde(default)]
    pub description_en: Option<String>,
    /// Tokens whose presence in a query penalizes this category
    #[serde(default)]
    pub negative_key_words_ar: Vec<String>,
    #[serde(default)]
    pub negative_key_words_en: Vec<String>,
    /// Disables the single-token containment shortcut for this category
    #[serde(default)]
    pub disallow_partial: bool,
    /// Reserved
    #[serde(default)]
    pub domain: Option<String>,
}

/// A scored match for one query, borrowing the matched records
///
/// Serializes camelCase to match the wire shape consumers expect
/// (`parentCategory`, `matchedKeywords`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMatch<'a> {
    pub category: &'a Category,
    pub parent_category: Option<&'a Category>,
    /// Ranking score in (0, 1]; not a calibrated probability
    pub confidence: f64,
    /// Up to three human-readable strings that contributed evidence,
    /// in the order they were found
    pub matched_keywords: Vec<String>,
}
