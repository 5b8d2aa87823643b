use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::ListingRecord;
use super::error::ConfigurationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub const fn label(self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
        }
    }

    fn compare(self, a: &ListingRecord, b: &ListingRecord) -> Ordering {
        match self {
            SortKey::PriceAsc => a.price.total_cmp(&b.price),
            SortKey::PriceDesc => b.price.total_cmp(&a.price),
            // `None < Some`, so reversing puts undated records last.
            SortKey::Default => b.created_at.cmp(&a.created_at),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "newest" => Ok(SortKey::Default),
            "price_asc" | "priceasc" => Ok(SortKey::PriceAsc),
            "price_desc" | "pricedesc" => Ok(SortKey::PriceDesc),
            other => Err(ConfigurationError::InvalidFilter {
                field: "sort",
                reason: format!("unknown sort key '{other}'"),
            }),
        }
    }
}

/// Stable sort into a new collection; equal keys keep their input order.
pub fn sort(records: &[ListingRecord], key: SortKey) -> Vec<ListingRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}
