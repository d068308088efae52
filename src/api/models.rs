// Query-string models for the domain endpoints.

use serde::Deserialize;

/// `year` selector: empty or "all" (any case) means every available
/// year, anything else a single four-digit year.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    #[serde(default)]
    pub year: String,
}

/// `year` plus the optional `category` filter for domains with
/// sub-categories. 0 (or absent) means all categories.
#[derive(Debug, Deserialize)]
pub struct YearCategoryQuery {
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub category: u8,
}
