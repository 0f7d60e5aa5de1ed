//! Township boundary extraction.
//!
//! Reads the MOI township shapefile, keeps the records of one county and
//! writes them out as a GeoJSON `FeatureCollection`:
//!
//! ```text
//! ShapefileSource -> RecordFilter -> assemble -> write_json_atomic
//! ```

pub mod collection;
pub mod error;
pub mod filter;
pub mod shape;
pub mod source;

use std::path::Path;

use city_common::{write_json_atomic, CityFilter, JsonStyle};
use geojson::FeatureCollection;
use tracing::info;

pub use collection::assemble;
pub use error::{BoundaryError, Result};
pub use filter::{FilterOutcome, RecordFilter};
pub use source::{ShapeRecord, ShapefileSource};

/// Result of one extraction run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub scanned: usize,
    pub collection: FeatureCollection,
}

impl Extraction {
    pub fn matched(&self) -> usize {
        self.collection.features.len()
    }
}

/// Filter every record of `source` and assemble the matches.
///
/// Fails before reading any record when the attribute table lacks the
/// filter column.
pub fn extract(source: &ShapefileSource, city: &CityFilter) -> Result<Extraction> {
    if !source.has_field(&city.field) {
        return Err(BoundaryError::MissingField {
            path: source.path().to_path_buf(),
            field: city.field.clone(),
        });
    }

    info!(path = %source.path().display(), "Processing shapes");

    let filter = RecordFilter::new(city.clone());
    let outcome = source.scan(|records| filter.apply(records))?;

    let extraction = Extraction {
        scanned: outcome.scanned,
        collection: assemble(outcome.features),
    };

    info!(
        scanned = extraction.scanned,
        matched = extraction.matched(),
        "Found {} town/districts in {}",
        extraction.matched(),
        city.target
    );

    Ok(extraction)
}

/// Run the whole pipeline: open, extract and write compact GeoJSON.
///
/// Nothing is written unless extraction succeeds.
pub fn extract_to_file(input: &Path, output: &Path, city: &CityFilter) -> Result<Extraction> {
    let source = ShapefileSource::open(input)?;
    let extraction = extract(&source, city)?;
    write_json_atomic(output, &extraction.collection, JsonStyle::Compact)?;
    Ok(extraction)
}
