use crate::infra::InMemoryListingBackend;
use crate::params::{ListingParams, ListingRequest};
use crate::routes::{ListingPageResponse, ListingView, MapResponse};
use clap::Args;
use listing_hub::config::{AppConfig, ListingsConfig};
use listing_hub::error::AppError;
use listing_hub::listings::{
    AgentId, CurrencyCode, InventorySnapshot, ListingAggregator, ListingRecord, MapViewport,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct BrowseArgs {
    /// Agent whose inventory should be listed
    #[arg(long)]
    pub(crate) agent: String,
    /// Directory holding properties.csv, marketplace.csv and unit_types.csv
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print the same JSON payload the HTTP surface returns
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) params: ListingParams,
}

struct Session {
    agent: AgentId,
    request: ListingRequest,
    currency: CurrencyCode,
    settings: ListingsConfig,
    records: Vec<ListingRecord>,
}

async fn open_session(args: BrowseArgs) -> Result<(Session, bool), AppError> {
    let BrowseArgs {
        agent,
        data_dir,
        json,
        params,
    } = args;

    let mut settings = AppConfig::load()?.listings;
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }

    let request = params.into_request(&settings)?;
    let currency = request.currency.unwrap_or(settings.display_currency);

    let inventory = InventorySnapshot::from_dir(&settings.data_dir)?;
    let aggregator =
        ListingAggregator::from_backend(Arc::new(InMemoryListingBackend::new(inventory)));
    let agent = AgentId(agent);
    let records = aggregator.load_listings(&agent).await?;

    Ok((
        Session {
            agent,
            request,
            currency,
            settings,
            records,
        },
        json,
    ))
}

pub(crate) async fn run_listings(args: BrowseArgs) -> Result<(), AppError> {
    let (session, json) = open_session(args).await?;
    let query = &session.request.query;
    let page = query.run(&session.records)?;

    let response = ListingPageResponse {
        agent_id: session.agent,
        currency: session.currency,
        sort: query.sort,
        page_number: page.page_number,
        total_pages: page.total_pages,
        total_items: page.total_items,
        items: ListingView::project(page.items, session.currency),
    };

    if json {
        return print_json(&response);
    }

    println!(
        "Listings for {} (sorted by {}, prices in {})",
        response.agent_id, response.sort, response.currency
    );
    println!(
        "Page {} of {} | {} matching listings",
        response.page_number, response.total_pages, response.total_items
    );
    if response.items.is_empty() {
        println!("  No listings on this page");
    }
    for (index, item) in response.items.iter().enumerate() {
        let record = &item.record;
        println!(
            "  {}. [{}] {} {} | {} | {} | {}",
            index + 1,
            record.provenance,
            record.id,
            record.title,
            record.property_type,
            record.contract_type.label(),
            record.location
        );
        println!(
            "     {} | {} | {}",
            rooms(record),
            status_line(record),
            item.display_price
        );
    }

    Ok(())
}

pub(crate) async fn run_map(args: BrowseArgs) -> Result<(), AppError> {
    let (session, json) = open_session(args).await?;
    let markers = session
        .request
        .query
        .map_markers(&session.records, session.settings.marker_offset)?;

    let response = MapResponse {
        agent_id: session.agent,
        currency: session.currency,
        viewport: MapViewport::for_records(&markers),
        markers: ListingView::project(markers, session.currency),
    };

    if json {
        return print_json(&response);
    }

    let unplaced = response
        .markers
        .iter()
        .filter(|marker| marker.record.position().is_none())
        .count();
    println!(
        "Map markers for {} ({} placed, {} without coordinates)",
        response.agent_id,
        response.markers.len() - unplaced,
        unplaced
    );
    match response.viewport {
        MapViewport::Empty => println!("Viewport: nothing to show"),
        MapViewport::Point { lat, lng } => println!("Viewport: centered on {lat:.6}, {lng:.6}"),
        MapViewport::Bounds {
            south,
            west,
            north,
            east,
        } => println!("Viewport: S {south:.6} W {west:.6} N {north:.6} E {east:.6}"),
    }

    for marker in &response.markers {
        let record = &marker.record;
        let Some(point) = record.position() else {
            continue;
        };
        println!(
            "  - [{}] {} {} @ {:.6}, {:.6} | {}",
            record.provenance, record.id, record.title, point.lat, point.lng, marker.display_price
        );
    }

    Ok(())
}

fn rooms(record: &ListingRecord) -> String {
    let beds = record
        .bedrooms
        .map(|beds| format!("{beds} bd"))
        .unwrap_or_else(|| "- bd".to_string());
    let baths = record
        .bathrooms
        .map(|baths| format!("{baths} ba"))
        .unwrap_or_else(|| "- ba".to_string());
    match record.sqft {
        Some(sqft) => format!("{beds} / {baths} / {sqft:.0} sqft"),
        None => format!("{beds} / {baths}"),
    }
}

fn status_line(record: &ListingRecord) -> String {
    let furnishing = record
        .furnishing_status
        .map(|status| status.label())
        .unwrap_or("furnishing n/a");
    let completion = record
        .completion_status
        .map(|status| status.label())
        .unwrap_or("completion n/a");
    format!("{furnishing}, {completion}")
}

fn print_json<T: Serialize>(payload: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing_hub::listings::{
        CompletionStatus, ContractType, FurnishingStatus, ListingId, Provenance,
    };
    use std::collections::{BTreeSet, HashMap};

    fn bare_record() -> ListingRecord {
        ListingRecord {
            id: ListingId("p-1".to_string()),
            provenance: Provenance::Direct,
            title: "Loft".to_string(),
            description: String::new(),
            property_type: "Apartment".to_string(),
            contract_type: ContractType::Rent,
            price: 90_000.0,
            location: "JLT".to_string(),
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

    #[test]
    fn absent_attributes_render_as_placeholders() {
        let record = bare_record();
        assert_eq!(rooms(&record), "- bd / - ba");
        assert_eq!(status_line(&record), "furnishing n/a, completion n/a");
    }

    #[test]
    fn present_attributes_render_with_units() {
        let mut record = bare_record();
        record.bedrooms = Some(0);
        record.bathrooms = Some(1.5);
        record.sqft = Some(612.4);
        record.furnishing_status = Some(FurnishingStatus::SemiFurnished);
        record.completion_status = Some(CompletionStatus::Ready);

        assert_eq!(rooms(&record), "0 bd / 1.5 ba / 612 sqft");
        assert_eq!(status_line(&record), "semi_furnished, ready");
    }

    #[test]
    fn unserializable_payload_is_an_error() {
        let payload = HashMap::from([((1_u8, 2_u8), "tuple keys are not json")]);
        match print_json(&payload) {
            Err(AppError::Serialization(_)) => {}
            other => panic!("expected serialization error, got {other:?}"),
        }
    }
}
