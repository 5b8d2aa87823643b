use serde::{Deserialize, Serialize};

use super::domain::{CompletionStatus, FurnishingStatus, ListingRecord};
use super::error::ConfigurationError;

/// Declarative listing filter. Unset fields and empty lists impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub property_type: Option<String>,
    /// Record location must be one of these labels.
    pub locations: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_beds: Option<u32>,
    pub min_baths: Option<f32>,
    pub furnishing_status: Option<FurnishingStatus>,
    pub completion_status: Option<CompletionStatus>,
    /// Record must carry every one of these amenities.
    pub amenities: Vec<String>,
}

impl FilterSpec {
    /// Reject bounds that can only come from a caller bug.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(value) = bound {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigurationError::InvalidFilter {
                        field,
                        reason: format!("{value} is not a non-negative amount"),
                    });
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ConfigurationError::InvalidFilter {
                    field: "min_price",
                    reason: format!("{min} exceeds max_price {max}"),
                });
            }
        }

        if let Some(baths) = self.min_baths {
            if !baths.is_finite() || baths < 0.0 {
                return Err(ConfigurationError::InvalidFilter {
                    field: "min_baths",
                    reason: format!("{baths} is not a non-negative count"),
                });
            }
        }

        Ok(())
    }

    /// Whether `record` satisfies every specified constraint.
    pub fn matches(&self, record: &ListingRecord) -> bool {
        if let Some(property_type) = &self.property_type {
            if &record.property_type != property_type {
                return false;
            }
        }

        if !self.locations.is_empty() && !self.locations.contains(&record.location) {
            return false;
        }

        if self.min_price.is_some_and(|min| record.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| record.price > max) {
            return false;
        }

        // An absent bedroom/bathroom count never satisfies a minimum.
        if let Some(min) = self.min_beds {
            if !record.bedrooms.is_some_and(|beds| beds >= min) {
                return false;
            }
        }
        if let Some(min) = self.min_baths {
            if !record.bathrooms.is_some_and(|baths| baths >= min) {
                return false;
            }
        }

        if self
            .furnishing_status
            .is_some_and(|status| record.furnishing_status != Some(status))
        {
            return false;
        }
        if self
            .completion_status
            .is_some_and(|status| record.completion_status != Some(status))
        {
            return false;
        }

        self.amenities
            .iter()
            .all(|amenity| record.amenities.contains(amenity))
    }
}

/// Matching subset of `records`, in input order.
pub fn filter(records: &[ListingRecord], spec: &FilterSpec) -> Vec<ListingRecord> {
    records
        .iter()
        .filter(|record| spec.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::testing::record;

    fn ids(records: &[ListingRecord]) -> Vec<&str> {
        records.iter().map(|record| record.id.0.as_str()).collect()
    }

    fn inventory() -> Vec<ListingRecord> {
        let mut villa = record("villa", 3_500_000.0, "Arabian Ranches");
        villa.property_type = "Villa".to_string();
        villa.bedrooms = Some(4);
        villa.bathrooms = Some(4.5);
        villa.furnishing_status = Some(FurnishingStatus::Unfurnished);
        villa.completion_status = Some(CompletionStatus::Ready);
        villa.amenities = ["Garden", "Pool", "Maid Room"]
            .into_iter()
            .map(String::from)
            .collect();

        let mut flat = record("flat", 1_200_000.0, "Dubai Marina");
        flat.bedrooms = Some(1);
        flat.bathrooms = Some(2.0);
        flat.furnishing_status = Some(FurnishingStatus::Furnished);
        flat.completion_status = Some(CompletionStatus::Ready);
        flat.amenities = ["Pool", "Gym"].into_iter().map(String::from).collect();

        let mut studio = record("studio", 650_000.0, "JVC");
        studio.bedrooms = Some(0);
        studio.completion_status = Some(CompletionStatus::OffPlan);

        let unknown = record("unknown", 900_000.0, "Dubai Marina");

        vec![villa, flat, studio, unknown]
    }

    #[test]
    fn empty_spec_keeps_everything() {
        let records = inventory();
        assert_eq!(filter(&records, &FilterSpec::default()), records);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let spec = FilterSpec {
            min_price: Some(650_000.0),
            max_price: Some(1_200_000.0),
            ..FilterSpec::default()
        };
        assert_eq!(
            ids(&filter(&inventory(), &spec)),
            vec!["flat", "studio", "unknown"]
        );
    }

    #[test]
    fn missing_bedrooms_fail_a_minimum_but_zero_is_a_value() {
        let spec = FilterSpec {
            min_beds: Some(0),
            ..FilterSpec::default()
        };
        assert_eq!(
            ids(&filter(&inventory(), &spec)),
            vec!["villa", "flat", "studio"]
        );

        let spec = FilterSpec {
            min_baths: Some(2.0),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter(&inventory(), &spec)), vec!["villa", "flat"]);
    }

    #[test]
    fn locations_match_exactly_and_empty_lists_are_unset() {
        let spec = FilterSpec {
            locations: vec!["Dubai Marina".to_string(), "JVC".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(
            ids(&filter(&inventory(), &spec)),
            vec!["flat", "studio", "unknown"]
        );

        let spec = FilterSpec {
            locations: vec!["Marina".to_string()],
            ..FilterSpec::default()
        };
        assert!(filter(&inventory(), &spec).is_empty());

        let spec = FilterSpec {
            locations: Vec::new(),
            amenities: Vec::new(),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&inventory(), &spec).len(), 4);
    }

    #[test]
    fn amenities_are_conjunctive() {
        let spec = FilterSpec {
            amenities: vec!["Pool".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter(&inventory(), &spec)), vec!["villa", "flat"]);

        let spec = FilterSpec {
            amenities: vec!["Pool".to_string(), "Garden".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter(&inventory(), &spec)), vec!["villa"]);
    }

    #[test]
    fn enumerated_fields_match_exactly() {
        let spec = FilterSpec {
            property_type: Some("Villa".to_string()),
            furnishing_status: Some(FurnishingStatus::Unfurnished),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter(&inventory(), &spec)), vec!["villa"]);

        let spec = FilterSpec {
            completion_status: Some(CompletionStatus::OffPlan),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter(&inventory(), &spec)), vec!["studio"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let specs = [
            FilterSpec::default(),
            FilterSpec {
                min_price: Some(800_000.0),
                locations: vec!["Dubai Marina".to_string()],
                ..FilterSpec::default()
            },
            FilterSpec {
                min_beds: Some(1),
                amenities: vec!["Pool".to_string()],
                ..FilterSpec::default()
            },
        ];

        for spec in specs {
            let once = filter(&inventory(), &spec);
            assert_eq!(filter(&once, &spec), once);
        }
    }

    #[test]
    fn validate_rejects_inverted_or_negative_bounds() {
        let inverted = FilterSpec {
            min_price: Some(10.0),
            max_price: Some(5.0),
            ..FilterSpec::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigurationError::InvalidFilter {
                field: "min_price",
                ..
            })
        ));

        let negative = FilterSpec {
            max_price: Some(-1.0),
            ..FilterSpec::default()
        };
        assert!(negative.validate().is_err());

        let baths = FilterSpec {
            min_baths: Some(f32::NAN),
            ..FilterSpec::default()
        };
        assert!(baths.validate().is_err());

        assert!(FilterSpec::default().validate().is_ok());
    }
}
