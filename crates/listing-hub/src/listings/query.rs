use std::num::NonZeroUsize;

use super::deoverlap::deoverlap_with;
use super::domain::ListingRecord;
use super::error::ConfigurationError;
use super::filter::{filter, FilterSpec};
use super::paginate::{paginate, Page};
use super::sort::{sort, SortKey};

/// A listing surface request: which records, in which order, which window.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: FilterSpec,
    pub sort: SortKey,
    pub page_size: NonZeroUsize,
    pub page: usize,
}

impl ListingQuery {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            filter: FilterSpec::default(),
            sort: SortKey::default(),
            page_size,
            page: 1,
        }
    }

    /// Filtered and sorted records, without windowing.
    pub fn select(
        &self,
        records: &[ListingRecord],
    ) -> Result<Vec<ListingRecord>, ConfigurationError> {
        self.filter.validate()?;
        Ok(sort(&filter(records, &self.filter), self.sort))
    }

    /// Filter, sort, then cut the requested page.
    pub fn run(&self, records: &[ListingRecord]) -> Result<Page, ConfigurationError> {
        let selected = self.select(records)?;
        Ok(paginate(&selected, self.page_size, self.page))
    }

    /// Filter, sort, then spread coincident markers by `offset`.
    pub fn map_markers(
        &self,
        records: &[ListingRecord],
        offset: f64,
    ) -> Result<Vec<ListingRecord>, ConfigurationError> {
        let selected = self.select(records)?;
        Ok(deoverlap_with(&selected, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::deoverlap::OFFSET_DISTANCE;
    use crate::listings::testing::{placed, record};

    fn page_size(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero")
    }

    #[test]
    fn run_filters_sorts_and_windows() {
        let records: Vec<_> = (1..=5)
            .map(|n| record(&format!("r{n}"), f64::from(n) * 100.0, "X"))
            .collect();
        let query = ListingQuery {
            filter: FilterSpec {
                min_price: Some(200.0),
                ..FilterSpec::default()
            },
            sort: SortKey::PriceDesc,
            page_size: page_size(2),
            page: 2,
        };

        let page = query.run(&records).expect("valid query");
        let ids: Vec<_> = page.items.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r2"]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 4);
    }

    #[test]
    fn invalid_filters_are_configuration_errors() {
        let mut query = ListingQuery::new(page_size(6));
        query.filter.min_price = Some(-5.0);
        assert!(matches!(
            query.run(&[record("a", 1.0, "X")]),
            Err(ConfigurationError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn map_markers_spread_after_filtering() {
        let mut hidden = placed("hidden", 25.2, 55.27);
        hidden.price = 10.0;
        let mut first = placed("first", 25.2, 55.27);
        first.price = 500.0;
        let mut second = placed("second", 25.2, 55.27);
        second.price = 600.0;

        let mut query = ListingQuery::new(page_size(6));
        query.filter.min_price = Some(100.0);
        query.sort = SortKey::PriceAsc;

        let markers = query
            .map_markers(&[hidden, second, first], OFFSET_DISTANCE)
            .expect("valid query");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id.0, "first");
        assert_eq!(markers[0].position().map(|point| point.lat), Some(25.2));
        assert_eq!(
            markers[1].position().map(|point| point.lat),
            Some(25.2 + OFFSET_DISTANCE)
        );
    }
}
