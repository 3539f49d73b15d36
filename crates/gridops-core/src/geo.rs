//! Projection of charger coordinates onto the map panel.
//!
//! Chargers are pinned on a bounded rectangular canvas addressed in
//! percentages: x grows eastward, y grows southward, both in [0, 100]. The
//! bounding box is widened to a minimum span around the data midpoint so a
//! sparse demo dataset does not collapse to a single screen point, and
//! projected pins are clamped away from the canvas edge. The projection is
//! deterministic and order-independent.

/// Minimum latitude span of the viewport, in degrees.
const MIN_LAT_SPAN: f64 = 0.18;
/// Minimum longitude span of the viewport, in degrees.
const MIN_LON_SPAN: f64 = 0.24;
/// Floor for degenerate spans, to avoid division by zero.
const SPAN_EPSILON: f64 = 0.0001;

/// One charger's location, deduplicated from its signals.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPoint {
    pub charger_id: String,
    pub lat: f64,
    pub lon: f64,
}

/// The viewport the projection maps from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// A projected pin position in canvas percentage space.
///
/// Always within [4, 96] horizontally and [6, 94] vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinPosition {
    pub x: f64,
    pub y: f64,
}

/// Compute the viewport for a set of charger locations.
///
/// The data's bounding box is expanded to at least `MIN_LAT_SPAN` ×
/// `MIN_LON_SPAN` degrees, centered on the data midpoint.
pub fn normalize_bounds(points: &[LocationPoint]) -> Option<MapBounds> {
    let first = points.first()?;

    let mut min_lat = first.lat;
    let mut max_lat = first.lat;
    let mut min_lon = first.lon;
    let mut max_lon = first.lon;
    for point in &points[1..] {
        min_lat = min_lat.min(point.lat);
        max_lat = max_lat.max(point.lat);
        min_lon = min_lon.min(point.lon);
        max_lon = max_lon.max(point.lon);
    }

    let center_lat = (min_lat + max_lat) / 2.0;
    let center_lon = (min_lon + max_lon) / 2.0;
    let lat_span = (max_lat - min_lat).max(MIN_LAT_SPAN);
    let lon_span = (max_lon - min_lon).max(MIN_LON_SPAN);

    Some(MapBounds {
        min_lat: center_lat - lat_span / 2.0,
        max_lat: center_lat + lat_span / 2.0,
        min_lon: center_lon - lon_span / 2.0,
        max_lon: center_lon + lon_span / 2.0,
    })
}

/// Project one coordinate into canvas percentage space.
///
/// Latitude maps north-up: larger latitudes land closer to the top of the
/// canvas (smaller y).
pub fn project(lat: f64, lon: f64, bounds: &MapBounds) -> PinPosition {
    let lon_span = (bounds.max_lon - bounds.min_lon).max(SPAN_EPSILON);
    let lat_span = (bounds.max_lat - bounds.min_lat).max(SPAN_EPSILON);

    let x = (lon - bounds.min_lon) / lon_span * 100.0;
    let y = 100.0 - (lat - bounds.min_lat) / lat_span * 100.0;

    PinPosition {
        x: x.clamp(4.0, 96.0),
        y: y.clamp(6.0, 94.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, lat: f64, lon: f64) -> LocationPoint {
        LocationPoint {
            charger_id: id.to_string(),
            lat,
            lon,
        }
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(normalize_bounds(&[]).is_none());
    }

    #[test]
    fn single_point_gets_minimum_span_viewport() {
        let bounds = normalize_bounds(&[point("AUS_0123", 30.2672, -97.7431)]).unwrap();

        assert!((bounds.max_lat - bounds.min_lat - MIN_LAT_SPAN).abs() < 1e-9);
        assert!((bounds.max_lon - bounds.min_lon - MIN_LON_SPAN).abs() < 1e-9);

        // The lone point sits at the viewport center, not a corner.
        let pos = project(30.2672, -97.7431, &bounds);
        assert!((pos.x - 50.0).abs() < 1e-6);
        assert!((pos.y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn projection_stays_inside_clamp_rect() {
        let points = vec![
            point("a", 30.2672, -97.7431),
            point("b", 30.2690, -97.7490),
            point("c", 31.9000, -95.1000),
        ];
        let bounds = normalize_bounds(&points).unwrap();

        for p in &points {
            let pos = project(p.lat, p.lon, &bounds);
            assert!((4.0..=96.0).contains(&pos.x), "x out of range: {}", pos.x);
            assert!((6.0..=94.0).contains(&pos.y), "y out of range: {}", pos.y);
        }

        // A point far outside the viewport clamps to the edge margin.
        let outside = project(89.0, 179.0, &bounds);
        assert_eq!(outside.x, 96.0);
        assert_eq!(outside.y, 6.0);
    }

    #[test]
    fn projection_is_order_independent() {
        let forward = vec![
            point("a", 30.2672, -97.7431),
            point("b", 30.2690, -97.7490),
        ];
        let reversed: Vec<LocationPoint> = forward.iter().rev().cloned().collect();

        let bounds_fwd = normalize_bounds(&forward).unwrap();
        let bounds_rev = normalize_bounds(&reversed).unwrap();
        assert_eq!(bounds_fwd, bounds_rev);

        let pos_fwd = project(30.2672, -97.7431, &bounds_fwd);
        let pos_rev = project(30.2672, -97.7431, &bounds_rev);
        assert_eq!(pos_fwd, pos_rev);
    }

    #[test]
    fn north_maps_to_smaller_y() {
        let points = vec![point("south", 30.0, -97.0), point("north", 31.0, -97.0)];
        let bounds = normalize_bounds(&points).unwrap();

        let north = project(31.0, -97.0, &bounds);
        let south = project(30.0, -97.0, &bounds);
        assert!(north.y < south.y);
    }
}
