//! GeoJSON assembly.

use geojson::{Feature, FeatureCollection};

/// Wrap features into a `FeatureCollection`, keeping their order.
///
/// Geometries are not validated.
pub fn assemble(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
