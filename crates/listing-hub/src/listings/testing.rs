use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::domain::{ContractType, Coordinate, ListingId, ListingRecord, Provenance};
use super::rows::parse_timestamp;

pub(crate) fn record(id: &str, price: f64, location: &str) -> ListingRecord {
    ListingRecord {
        id: ListingId(id.to_string()),
        provenance: Provenance::Direct,
        title: format!("Listing {id}"),
        description: String::new(),
        property_type: "Apartment".to_string(),
        contract_type: ContractType::Sale,
        price,
        location: location.to_string(),
        bedrooms: None,
        bathrooms: None,
        sqft: None,
        furnishing_status: None,
        completion_status: None,
        amenities: BTreeSet::new(),
        lat: None,
        lng: None,
        created_at: None,
    }
}

pub(crate) fn placed(id: &str, lat: f64, lng: f64) -> ListingRecord {
    let mut listing = record(id, 1_000_000.0, "Downtown Dubai");
    listing.lat = Some(Coordinate::Number(lat));
    listing.lng = Some(Coordinate::Number(lng));
    listing
}

pub(crate) fn created(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value)
}
