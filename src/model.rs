// Output tree shared by the live scrape path and the CSV snapshot fallback.

use serde::{Deserialize, Serialize};

/// Top-level grouping of a response: one per sub-category, or a single
/// "no category" group for domains without sub-categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub title: String,
    pub types: Vec<TypeGroup>,
}

/// A product type scanned out of one results table for one year.
/// Insertion order mirrors row order in the source; never sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeGroup {
    pub title: String,
    pub year: i32,
    pub total_quantity: String,
    pub items: Vec<ItemRecord>,
}

impl TypeGroup {
    pub fn new(title: impl Into<String>, year: i32, total_quantity: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year,
            total_quantity: total_quantity.into(),
            items: Vec::new(),
        }
    }
}

/// Leaf record. Quantities stay opaque locale-formatted strings
/// (thousands separator `.`); units are domain constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub title: String,
    pub quantity: String,
    pub quantity_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_unit: Option<String>,
}

impl ItemRecord {
    pub fn plain(title: impl Into<String>, quantity: impl Into<String>, unit: &str) -> Self {
        Self {
            title: title.into(),
            quantity: quantity.into(),
            quantity_unit: unit.to_string(),
            value: None,
            value_unit: None,
        }
    }

    pub fn with_value(
        title: impl Into<String>,
        quantity: impl Into<String>,
        unit: &str,
        value: impl Into<String>,
        value_unit: &str,
    ) -> Self {
        Self {
            title: title.into(),
            quantity: quantity.into(),
            quantity_unit: unit.to_string(),
            value: Some(value.into()),
            value_unit: Some(value_unit.to_string()),
        }
    }
}
