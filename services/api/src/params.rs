use crate::infra::comma_list;
use clap::Args;
use listing_hub::config::ListingsConfig;
use listing_hub::listings::{
    CompletionStatus, ConfigurationError, CurrencyCode, FilterSpec, FurnishingStatus,
    ListingQuery, SortKey,
};
use serde::Deserialize;
use std::num::NonZeroUsize;

/// Listing surface parameters as they arrive on a query string or the command line.
#[derive(Args, Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ListingParams {
    /// Property type, e.g. Apartment or Villa
    #[arg(long = "type")]
    #[serde(rename = "type")]
    pub(crate) property_type: Option<String>,
    /// Comma-separated location labels
    #[arg(long)]
    pub(crate) locations: Option<String>,
    #[arg(long)]
    pub(crate) min_price: Option<f64>,
    #[arg(long)]
    pub(crate) max_price: Option<f64>,
    #[arg(long)]
    pub(crate) min_beds: Option<u32>,
    #[arg(long)]
    pub(crate) min_baths: Option<f32>,
    /// furnished, semi_furnished or unfurnished
    #[arg(long)]
    pub(crate) furnishing_status: Option<String>,
    /// ready or off_plan
    #[arg(long)]
    pub(crate) completion_status: Option<String>,
    /// Comma-separated amenities; every one must be present
    #[arg(long)]
    pub(crate) amenities: Option<String>,
    /// default, price_asc or price_desc
    #[arg(long)]
    pub(crate) sort: Option<String>,
    /// 1-indexed page number
    #[arg(long)]
    pub(crate) page: Option<usize>,
    #[arg(long)]
    pub(crate) page_size: Option<usize>,
    /// Display currency code (AED, USD, EUR, GBP, SAR, INR)
    #[arg(long)]
    pub(crate) currency: Option<String>,
}

/// Parsed parameters. `currency` stays unset when the caller did not pick one.
#[derive(Debug, Clone)]
pub(crate) struct ListingRequest {
    pub(crate) query: ListingQuery,
    pub(crate) currency: Option<CurrencyCode>,
}

impl ListingParams {
    pub(crate) fn into_request(
        self,
        settings: &ListingsConfig,
    ) -> Result<ListingRequest, ConfigurationError> {
        let furnishing_status = self
            .furnishing_status
            .as_deref()
            .map(|raw| {
                FurnishingStatus::parse(raw).ok_or_else(|| invalid("furnishing_status", raw))
            })
            .transpose()?;
        let completion_status = self
            .completion_status
            .as_deref()
            .map(|raw| {
                CompletionStatus::parse(raw).ok_or_else(|| invalid("completion_status", raw))
            })
            .transpose()?;

        let sort = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortKey>()?,
            None => SortKey::default(),
        };

        let page_size = match self.page_size {
            Some(raw) => NonZeroUsize::new(raw).ok_or(ConfigurationError::InvalidFilter {
                field: "page_size",
                reason: "must be at least 1".to_string(),
            })?,
            None => settings.page_size,
        };

        let currency = self
            .currency
            .as_deref()
            .map(str::parse::<CurrencyCode>)
            .transpose()?;

        let filter = FilterSpec {
            property_type: self.property_type.filter(|value| !value.trim().is_empty()),
            locations: comma_list(self.locations.as_deref()),
            min_price: self.min_price,
            max_price: self.max_price,
            min_beds: self.min_beds,
            min_baths: self.min_baths,
            furnishing_status,
            completion_status,
            amenities: comma_list(self.amenities.as_deref()),
        };
        filter.validate()?;

        Ok(ListingRequest {
            query: ListingQuery {
                filter,
                sort,
                page_size,
                page: self.page.unwrap_or(1),
            },
            currency,
        })
    }
}

fn invalid(field: &'static str, raw: &str) -> ConfigurationError {
    ConfigurationError::InvalidFilter {
        field,
        reason: format!("unrecognized value '{raw}'"),
    }
}
