//! Marker collision avoidance for map surfaces.
//!
//! Records sharing a parsed `(lat, lng)` pair are fanned out diagonally in input
//! order: the first keeps its coordinates exactly as delivered, the Nth is rewritten
//! to numeric coordinates moved by `offset × (N − 1)` on both axes. This is a
//! deterministic heuristic, not force-directed spreading; the same input order
//! always yields the same layout.

use std::collections::HashMap;

use serde::Serialize;

use super::domain::{Coordinate, GeoPoint, ListingRecord};

/// Default diagonal step, in degrees.
pub const OFFSET_DISTANCE: f64 = 0.0001;

pub fn deoverlap(records: &[ListingRecord]) -> Vec<ListingRecord> {
    deoverlap_with(records, OFFSET_DISTANCE)
}

/// Copy of `records` with coincident markers offset by multiples of `offset`.
///
/// Records without a parsable position are passed through unchanged and do not
/// take part in collision counting.
pub fn deoverlap_with(records: &[ListingRecord], offset: f64) -> Vec<ListingRecord> {
    let mut seen: HashMap<(u64, u64), u32> = HashMap::new();

    records
        .iter()
        .map(|record| {
            let mut placed = record.clone();
            let Some(GeoPoint { lat, lng }) = record.position() else {
                return placed;
            };

            let count = seen.entry((coordinate_key(lat), coordinate_key(lng))).or_insert(0);
            *count += 1;
            if *count == 1 {
                return placed;
            }

            let shift = offset * f64::from(*count - 1);
            placed.lat = Some(Coordinate::Number(lat + shift));
            placed.lng = Some(Coordinate::Number(lng + shift));
            placed
        })
        .collect()
}

fn coordinate_key(value: f64) -> u64 {
    // -0.0 and 0.0 are the same place.
    if value == 0.0 {
        0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// How a map surface should frame a set of markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapViewport {
    Empty,
    /// Exactly one mappable record: center and zoom on it instead of fitting bounds.
    Point { lat: f64, lng: f64 },
    Bounds {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
}

impl MapViewport {
    pub fn for_records(records: &[ListingRecord]) -> Self {
        let mut points = records.iter().filter_map(ListingRecord::position);
        let Some(first) = points.next() else {
            return MapViewport::Empty;
        };

        let mut bounds = (first.lat, first.lng, first.lat, first.lng);
        let mut single = true;
        for point in points {
            single = false;
            bounds.0 = bounds.0.min(point.lat);
            bounds.1 = bounds.1.min(point.lng);
            bounds.2 = bounds.2.max(point.lat);
            bounds.3 = bounds.3.max(point.lng);
        }

        if single {
            MapViewport::Point {
                lat: first.lat,
                lng: first.lng,
            }
        } else {
            MapViewport::Bounds {
                south: bounds.0,
                west: bounds.1,
                north: bounds.2,
                east: bounds.3,
            }
        }
    }
}
