//! Record filter: keeps the shape records of one county.

use city_common::CityFilter;
use geojson::Feature;
use tracing::debug;

use crate::error::Result;
use crate::shape;
use crate::source::ShapeRecord;

/// Outcome of filtering a record stream.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Records read from the source
    pub scanned: usize,
    /// Matching records, in source order
    pub features: Vec<Feature>,
}

/// Filters shape records by an exact-match county predicate.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    city: CityFilter,
}

impl RecordFilter {
    pub fn new(city: CityFilter) -> Self {
        Self { city }
    }

    pub fn city(&self) -> &CityFilter {
        &self.city
    }

    /// Consume `records`, converting only the matches into features.
    ///
    /// The first read or conversion error stops the scan.
    pub fn apply<I>(&self, records: I) -> Result<FilterOutcome>
    where
        I: IntoIterator<Item = Result<ShapeRecord>>,
    {
        let mut scanned = 0;
        let mut features = Vec::new();

        for record in records {
            let record = record?;
            scanned += 1;

            if !self.city.matches(&record.properties) {
                continue;
            }

            debug!(index = scanned - 1, "Record matches county");
            features.push(to_feature(record)?);
        }

        Ok(FilterOutcome { scanned, features })
    }
}

/// Wrap a record as a GeoJSON feature with all of its properties.
pub fn to_feature(record: ShapeRecord) -> Result<Feature> {
    let geometry = shape::to_geometry(&record.shape)?;
    Ok(Feature {
        bbox: None,
        geometry,
        id: None,
        properties: Some(record.properties),
        foreign_members: None,
    })
}
