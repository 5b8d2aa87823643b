//! Listing aggregation and presentation pipeline shared by every listing surface.
//!
//! Collectors feed the aggregator; the aggregated records then flow through
//! filter, sort and either pagination (list views) or de-overlap (map views).

pub mod aggregate;
pub mod currency;
pub mod deoverlap;
pub mod domain;
mod error;
pub mod filter;
pub mod import;
pub mod paginate;
pub mod query;
pub mod rows;
pub mod sort;
pub mod sources;

#[cfg(test)]
mod testing;

pub use aggregate::{
    FeedSnapshot, FeedUpdate, ListingAggregator, ListingFeed, LoadError, LoadSequencer,
    LoadTicket,
};
pub use currency::{
    format_price, CurrencyCode, CurrencyPreferenceStore, InMemoryCurrencyPreferences,
};
pub use deoverlap::{deoverlap, deoverlap_with, MapViewport, OFFSET_DISTANCE};
pub use domain::{
    AgentId, CompletionStatus, ContractType, Coordinate, FurnishingStatus, GeoPoint, ListingId,
    ListingRecord, Provenance, SourceListing,
};
pub use error::ConfigurationError;
pub use filter::{filter, FilterSpec};
pub use import::{ImportError, InventorySnapshot};
pub use paginate::{paginate, Page};
pub use query::ListingQuery;
pub use rows::{MarketplaceRow, PropertyRow, RowError, UnitTypeRow};
pub use sort::{sort, SortKey};
pub use sources::{
    AgentPropertySource, BackendError, DeveloperUnitSource, ListingBackend, ListingSource,
    MarketplaceSource, SourceError,
};
