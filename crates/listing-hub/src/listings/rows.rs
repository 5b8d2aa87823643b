//! Raw row shapes as each backend table names them, and their re-keying into
//! [`SourceListing`].

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{
    CompletionStatus, ContractType, Coordinate, FurnishingStatus, ListingId, SourceListing,
};

/// Row of the agent-owned `properties` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRow {
    pub id: String,
    pub agent_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub property_type: String,
    pub contract_type: String,
    pub price: f64,
    pub location: String,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default)]
    pub sqft: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub furnishing_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub completion_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub amenities: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub created_at: Option<String>,
}

/// Row of the shared marketplace table, with the agents that opted into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceRow {
    pub listing_id: String,
    pub owner_agent_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub opted_in_agents: Option<String>,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub category: String,
    pub listing_type: String,
    pub asking_price: f64,
    pub community: String,
    #[serde(default)]
    pub beds: Option<u32>,
    #[serde(default)]
    pub baths: Option<f32>,
    #[serde(default)]
    pub area_sqft: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub furnishing: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub features: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub lng: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub published_at: Option<String>,
}

impl MarketplaceRow {
    pub fn opted_in(&self, agent_id: &str) -> bool {
        split_list(self.opted_in_agents.as_deref()).contains(agent_id)
    }
}

/// Unit-type row of a developer project inventory attached to an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTypeRow {
    pub unit_type_id: String,
    pub agent_id: String,
    pub project_name: String,
    pub unit_type: String,
    #[serde(default)]
    pub description: String,
    pub property_type: String,
    pub starting_price: f64,
    pub project_location: String,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default)]
    pub size_sqft: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub handover_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub project_amenities: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub created_at: Option<String>,
}

/// A raw row that cannot become a listing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("listing {id}: price {price} is not a non-negative number")]
    InvalidPrice { id: String, price: f64 },
    #[error("listing {id}: unknown contract type '{value}'")]
    UnknownContractType { id: String, value: String },
}

impl TryFrom<PropertyRow> for SourceListing {
    type Error = RowError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let price = checked_price(&row.id, row.price)?;
        let contract_type = contract_type(&row.id, &row.contract_type)?;

        Ok(SourceListing {
            id: ListingId(row.id),
            title: row.title,
            description: row.description,
            property_type: row.property_type,
            contract_type,
            price,
            location: row.location,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            sqft: row.sqft,
            furnishing_status: row.furnishing_status.as_deref().and_then(FurnishingStatus::parse),
            completion_status: row
                .completion_status
                .as_deref()
                .and_then(CompletionStatus::parse),
            amenities: split_list(row.amenities.as_deref()),
            lat: row.latitude.map(Coordinate::Text),
            lng: row.longitude.map(Coordinate::Text),
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

impl TryFrom<MarketplaceRow> for SourceListing {
    type Error = RowError;

    fn try_from(row: MarketplaceRow) -> Result<Self, Self::Error> {
        let price = checked_price(&row.listing_id, row.asking_price)?;
        let contract_type = contract_type(&row.listing_id, &row.listing_type)?;

        Ok(SourceListing {
            id: ListingId(row.listing_id),
            title: row.title,
            description: row.summary,
            property_type: row.category,
            contract_type,
            price,
            location: row.community,
            bedrooms: row.beds,
            bathrooms: row.baths,
            sqft: row.area_sqft,
            furnishing_status: row.furnishing.as_deref().and_then(FurnishingStatus::parse),
            completion_status: row.status.as_deref().and_then(CompletionStatus::parse),
            amenities: split_list(row.features.as_deref()),
            lat: row.lat.map(Coordinate::Text),
            lng: row.lng.map(Coordinate::Text),
            created_at: row.published_at.as_deref().and_then(parse_timestamp),
        })
    }
}

impl TryFrom<UnitTypeRow> for SourceListing {
    type Error = RowError;

    fn try_from(row: UnitTypeRow) -> Result<Self, Self::Error> {
        let price = checked_price(&row.unit_type_id, row.starting_price)?;

        Ok(SourceListing {
            title: format!("{} - {}", row.project_name, row.unit_type),
            id: ListingId(row.unit_type_id),
            description: row.description,
            property_type: row.property_type,
            // Developer inventory is only ever offered for sale.
            contract_type: ContractType::Sale,
            price,
            location: row.project_location,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            sqft: row.size_sqft,
            furnishing_status: None,
            completion_status: row
                .handover_status
                .as_deref()
                .and_then(CompletionStatus::parse),
            amenities: split_list(row.project_amenities.as_deref()),
            lat: row.latitude.map(Coordinate::Text),
            lng: row.longitude.map(Coordinate::Text),
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

fn checked_price(id: &str, price: f64) -> Result<f64, RowError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(RowError::InvalidPrice {
            id: id.to_string(),
            price,
        })
    }
}

fn contract_type(id: &str, raw: &str) -> Result<ContractType, RowError> {
    ContractType::parse(raw).ok_or_else(|| RowError::UnknownContractType {
        id: id.to_string(),
        value: raw.to_string(),
    })
}

/// `;`-separated list column into a set, dropping blanks.
pub(crate) fn split_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
