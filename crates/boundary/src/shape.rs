//! Conversion of decoded shapefile shapes into GeoJSON geometries.
//!
//! Only x/y are kept; M and Z values are dropped. Polygon rings are grouped
//! the way the shapefile stores them: every outer ring opens a new polygon
//! and the inner rings that follow it are its holes.

use geojson::{Geometry, Value};
use shapefile::{Point, PointM, PointZ, PolygonRing, Shape};

use crate::error::{BoundaryError, Result};

/// GeoJSON position type (`[x, y]`).
type Position = Vec<f64>;

trait Planar {
    fn position(&self) -> Position;
}

impl Planar for Point {
    fn position(&self) -> Position {
        vec![self.x, self.y]
    }
}

impl Planar for PointM {
    fn position(&self) -> Position {
        vec![self.x, self.y]
    }
}

impl Planar for PointZ {
    fn position(&self) -> Position {
        vec![self.x, self.y]
    }
}

/// Convert a shape into its GeoJSON geometry.
///
/// Returns `Ok(None)` for null shapes, which serialize as `"geometry": null`.
pub fn to_geometry(shape: &Shape) -> Result<Option<Geometry>> {
    let value = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Value::Point(p.position()),
        Shape::PointM(p) => Value::Point(p.position()),
        Shape::PointZ(p) => Value::Point(p.position()),
        Shape::Multipoint(m) => Value::MultiPoint(positions(m.points())),
        Shape::MultipointM(m) => Value::MultiPoint(positions(m.points())),
        Shape::MultipointZ(m) => Value::MultiPoint(positions(m.points())),
        Shape::Polyline(l) => polyline_value(l.parts()),
        Shape::PolylineM(l) => polyline_value(l.parts()),
        Shape::PolylineZ(l) => polyline_value(l.parts()),
        Shape::Polygon(p) => polygon_value(p.rings()),
        Shape::PolygonM(p) => polygon_value(p.rings()),
        Shape::PolygonZ(p) => polygon_value(p.rings()),
        Shape::Multipatch(_) => {
            return Err(BoundaryError::UnsupportedShape("Multipatch".to_string()))
        }
    };
    Ok(Some(Geometry::new(value)))
}

fn positions<P: Planar>(points: &[P]) -> Vec<Position> {
    points.iter().map(Planar::position).collect()
}

fn polyline_value<P: Planar>(parts: &[Vec<P>]) -> Value {
    let mut lines: Vec<Vec<Position>> = parts.iter().map(|part| positions(part)).collect();
    if lines.len() == 1 {
        Value::LineString(lines.remove(0))
    } else {
        Value::MultiLineString(lines)
    }
}

fn polygon_value<P: Planar>(rings: &[PolygonRing<P>]) -> Value {
    let mut polygons: Vec<Vec<Vec<Position>>> = Vec::new();

    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => polygons.push(vec![positions(points)]),
            PolygonRing::Inner(points) => match polygons.last_mut() {
                Some(polygon) => polygon.push(positions(points)),
                // A hole before any outer ring; keep it as its own polygon
                None => polygons.push(vec![positions(points)]),
            },
        }
    }

    if polygons.len() == 1 {
        Value::Polygon(polygons.remove(0))
    } else {
        Value::MultiPolygon(polygons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::{Multipoint, Polygon, Polyline};

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x, y + size),
            Point::new(x + size, y + size),
            Point::new(x + size, y),
            Point::new(x, y),
        ]
    }

    #[test]
    fn test_null_shape_has_no_geometry() {
        assert!(to_geometry(&Shape::NullShape).unwrap().is_none());
    }

    #[test]
    fn test_point() {
        let geometry = to_geometry(&Shape::Point(Point::new(121.3, 24.99)))
            .unwrap()
            .unwrap();
        assert_eq!(geometry.value, Value::Point(vec![121.3, 24.99]));
    }

    #[test]
    fn test_point_z_drops_z() {
        let geometry = to_geometry(&Shape::PointZ(PointZ::new(1.0, 2.0, 3.0, 4.0)))
            .unwrap()
            .unwrap();
        assert_eq!(geometry.value, Value::Point(vec![1.0, 2.0]));
    }

    #[test]
    fn test_multipoint() {
        let shape = Shape::Multipoint(Multipoint::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        ]));
        match to_geometry(&shape).unwrap().unwrap().value {
            Value::MultiPoint(points) => assert_eq!(points, vec![vec![0.0, 0.0], vec![1.0, 1.0]]),
            other => panic!("expected MultiPoint, got {other:?}"),
        }
    }

    #[test]
    fn test_single_part_polyline_is_line_string() {
        let shape = Shape::Polyline(Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 1.0),
        ]));
        match to_geometry(&shape).unwrap().unwrap().value {
            Value::LineString(line) => assert_eq!(line, vec![vec![0.0, 0.0], vec![2.0, 1.0]]),
            other => panic!("expected LineString, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_part_polyline_is_multi_line_string() {
        let shape = Shape::Polyline(Polyline::with_parts(vec![
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0)],
        ]));
        match to_geometry(&shape).unwrap().unwrap().value {
            Value::MultiLineString(lines) => assert_eq!(lines.len(), 2),
            other => panic!("expected MultiLineString, got {other:?}"),
        }
    }

    #[test]
    fn test_single_outer_ring_is_polygon() {
        let shape = Shape::Polygon(Polygon::new(PolygonRing::Outer(square(0.0, 0.0, 1.0))));
        match to_geometry(&shape).unwrap().unwrap().value {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].first(), rings[0].last());
                assert_eq!(rings[0].len(), 5);
            }
            other => panic!("expected Polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_hole_attaches_to_preceding_outer_ring() {
        let shape = Shape::Polygon(Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Inner(square(2.0, 2.0, 2.0)),
        ]));
        match to_geometry(&shape).unwrap().unwrap().value {
            Value::Polygon(rings) => assert_eq!(rings.len(), 2),
            other => panic!("expected Polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_two_outer_rings_are_multi_polygon() {
        let shape = Shape::Polygon(Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Inner(square(2.0, 2.0, 2.0)),
            PolygonRing::Outer(square(20.0, 20.0, 1.0)),
        ]));
        match to_geometry(&shape).unwrap().unwrap().value {
            Value::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[0].len(), 2);
                assert_eq!(polygons[1].len(), 1);
            }
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }
}
