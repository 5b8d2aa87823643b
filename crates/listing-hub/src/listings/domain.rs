use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the agent whose surfaces are being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing identifier. Only unique within the collection that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Originating source collection of an aggregated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Direct,
    Marketplace,
    DeveloperUnit,
}

impl Provenance {
    /// Aggregation order, also the tie-break order for stable sorts.
    pub const ORDER: [Provenance; 3] = [
        Provenance::Direct,
        Provenance::Marketplace,
        Provenance::DeveloperUnit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Provenance::Direct => "direct",
            Provenance::Marketplace => "marketplace",
            Provenance::DeveloperUnit => "developer_unit",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    Sale,
    Rent,
}

impl ContractType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "sale" | "sell" | "forsale" => Some(Self::Sale),
            "rent" | "rental" | "lease" | "forrent" => Some(Self::Rent),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ContractType::Sale => "Sale",
            ContractType::Rent => "Rent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnishingStatus {
    Furnished,
    SemiFurnished,
    Unfurnished,
}

impl FurnishingStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "furnished" => Some(Self::Furnished),
            "semifurnished" | "partlyfurnished" => Some(Self::SemiFurnished),
            "unfurnished" | "notfurnished" => Some(Self::Unfurnished),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FurnishingStatus::Furnished => "furnished",
            FurnishingStatus::SemiFurnished => "semi_furnished",
            FurnishingStatus::Unfurnished => "unfurnished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Ready,
    OffPlan,
}

impl CompletionStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "ready" | "completed" | "readytomovein" => Some(Self::Ready),
            "offplan" | "underconstruction" => Some(Self::OffPlan),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CompletionStatus::Ready => "ready",
            CompletionStatus::OffPlan => "off_plan",
        }
    }
}

fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map coordinate as delivered by a source: numeric, or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// Parsed value, or `None` when the coordinate cannot be placed on a map.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(value) => *value,
            Coordinate::Text(raw) => raw.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Collector output: a listing re-keyed into the common attribute names.
///
/// Provenance is deliberately absent; only the aggregator assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceListing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub contract_type: ContractType,
    pub price: f64,
    pub location: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub sqft: Option<f64>,
    pub furnishing_status: Option<FurnishingStatus>,
    pub completion_status: Option<CompletionStatus>,
    pub amenities: BTreeSet<String>,
    pub lat: Option<Coordinate>,
    pub lng: Option<Coordinate>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SourceListing {
    pub(crate) fn into_record(self, provenance: Provenance) -> ListingRecord {
        let SourceListing {
            id,
            title,
            description,
            property_type,
            contract_type,
            price,
            location,
            bedrooms,
            bathrooms,
            sqft,
            furnishing_status,
            completion_status,
            amenities,
            lat,
            lng,
            created_at,
        } = self;

        ListingRecord {
            id,
            provenance,
            title,
            description,
            property_type,
            contract_type,
            price,
            location,
            bedrooms,
            bathrooms,
            sqft,
            furnishing_status,
            completion_status,
            amenities,
            lat,
            lng,
            created_at,
        }
    }
}

/// Unified listing shape consumed by every listing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub id: ListingId,
    pub provenance: Provenance,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub contract_type: ContractType,
    pub price: f64,
    pub location: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub sqft: Option<f64>,
    pub furnishing_status: Option<FurnishingStatus>,
    pub completion_status: Option<CompletionStatus>,
    pub amenities: BTreeSet<String>,
    pub lat: Option<Coordinate>,
    pub lng: Option<Coordinate>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ListingRecord {
    /// Parsed map position; `None` when either coordinate is missing or unparsable.
    pub fn position(&self) -> Option<GeoPoint> {
        let lat = self.lat.as_ref()?.value()?;
        let lng = self.lng.as_ref()?.value()?;
        Some(GeoPoint { lat, lng })
    }
}
