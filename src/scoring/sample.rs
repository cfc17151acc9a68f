//! Interior-point sampling for polygon regions.
//!
//! A region is approximated by a bounded, deterministic grid of interior
//! points rather than exact area integration; the consuming scorer only
//! needs representative points.

use crate::error::AggregationError;

/// Hard cap on the number of interior samples for one region request.
pub const MAX_SAMPLES: usize = 36;

/// Guards the crossing computation against a zero-length edge left by a
/// duplicated closing vertex.
const EDGE_EPSILON: f64 = 1e-12;

/// Even-odd ray-casting containment test against a polygon ring.
///
/// Casts a ray along the latitude line and toggles an inside flag on each
/// boundary crossing. The ring is an ordered sequence of `(lon, lat)`
/// vertices; it does not need to repeat the first vertex at the end. An
/// empty ring contains nothing.
pub fn point_in_polygon(lon: f64, lat: f64, ring: &[(f64, f64)]) -> bool {
    if ring.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        let crosses = (yi > lat) != (yj > lat)
            && lon < (xj - xi) * (lat - yi) / (yj - yi + EDGE_EPSILON) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Vertex-average centroid of a ring, returned as `(lon, lat)`.
fn centroid(ring: &[(f64, f64)]) -> (f64, f64) {
    let n = ring.len() as f64;
    let (lon_sum, lat_sum) = ring
        .iter()
        .fold((0.0, 0.0), |(xs, ys), (x, y)| (xs + x, ys + y));
    (lon_sum / n, lat_sum / n)
}

/// Generates up to `target` interior sample coordinates for a polygon ring.
///
/// The ring's bounding box is covered by a square grid with at least
/// `target` cells; cell centers that test inside the ring are kept in
/// row-major order (latitude rows from the south, longitude columns from
/// the west) until the target is reached. Degenerate polygons, and
/// polygons thinner than one grid cell, fall back to a single sample at
/// the vertex-average centroid.
///
/// Returns `(lat, lon)` pairs; `target` is clamped to `[1, MAX_SAMPLES]`.
pub fn generate_samples(
    ring: &[(f64, f64)],
    target: usize,
) -> Result<Vec<(f64, f64)>, AggregationError> {
    if ring.is_empty() {
        return Err(AggregationError::InvalidPolygon(
            "polygon ring is empty".to_string(),
        ));
    }
    if ring
        .iter()
        .any(|(lon, lat)| !lon.is_finite() || !lat.is_finite())
    {
        return Err(AggregationError::InvalidPolygon(
            "polygon contains a non-finite coordinate".to_string(),
        ));
    }

    let target = target.clamp(1, MAX_SAMPLES);

    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    for &(lon, lat) in ring {
        min_lon = min_lon.min(lon);
        max_lon = max_lon.max(lon);
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
    }

    if max_lon - min_lon <= 0.0 || max_lat - min_lat <= 0.0 {
        let (lon, lat) = centroid(ring);
        return Ok(vec![(lat, lon)]);
    }

    let side = (target as f64).sqrt().ceil() as usize;
    let cell_width = (max_lon - min_lon) / side as f64;
    let cell_height = (max_lat - min_lat) / side as f64;

    let mut samples = Vec::with_capacity(target);
    'scan: for row in 0..side {
        let lat = min_lat + (row as f64 + 0.5) * cell_height;
        for col in 0..side {
            let lon = min_lon + (col as f64 + 0.5) * cell_width;
            if point_in_polygon(lon, lat, ring) {
                samples.push((lat, lon));
                if samples.len() == target {
                    break 'scan;
                }
            }
        }
    }

    if samples.is_empty() {
        let (lon, lat) = centroid(ring);
        samples.push((lat, lon));
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit square from (0,0) to (1,1) in (lon, lat) order.
    fn unit_square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    #[test]
    fn test_centroid_of_convex_ring_is_inside() {
        let ring = vec![(2.0, 1.0), (6.0, 1.5), (5.5, 5.0), (2.5, 4.5)];
        let (lon, lat) = centroid(&ring);
        assert!(point_in_polygon(lon, lat, &ring));
    }

    #[test]
    fn test_point_outside_square() {
        assert!(!point_in_polygon(2.0, 0.5, &unit_square()));
        assert!(!point_in_polygon(0.5, -0.5, &unit_square()));
    }

    #[test]
    fn test_empty_ring_contains_no_point() {
        assert!(!point_in_polygon(0.0, 0.0, &[]));
    }

    #[test]
    fn test_point_inside_square_with_closing_vertex() {
        // A duplicated closing vertex introduces a zero-length edge
        let mut ring = unit_square();
        ring.push((0.0, 0.0));
        assert!(point_in_polygon(0.5, 0.5, &ring));
        assert!(!point_in_polygon(1.5, 0.5, &ring));
    }

    #[test]
    fn test_concave_polygon_notch_is_outside() {
        // A square with a notch cut into its right side
        let ring = vec![
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.5),
            (2.0, 2.0),
            (4.0, 2.5),
            (4.0, 4.0),
            (0.0, 4.0),
        ];
        assert!(point_in_polygon(1.0, 2.0, &ring));
        assert!(!point_in_polygon(3.5, 2.0, &ring));
    }

    #[test]
    fn test_square_target_nine_yields_full_grid() {
        let samples = generate_samples(&unit_square(), 9).unwrap();
        assert_eq!(samples.len(), 9);

        // 3x3 grid of cell centers, scanned south to north, west to east
        let expected = [
            (1.0 / 6.0, 1.0 / 6.0),
            (1.0 / 6.0, 0.5),
            (1.0 / 6.0, 5.0 / 6.0),
            (0.5, 1.0 / 6.0),
            (0.5, 0.5),
            (0.5, 5.0 / 6.0),
            (5.0 / 6.0, 1.0 / 6.0),
            (5.0 / 6.0, 0.5),
            (5.0 / 6.0, 5.0 / 6.0),
        ];
        for (sample, expected) in samples.iter().zip(expected) {
            assert!((sample.0 - expected.0).abs() < 1e-9);
            assert!((sample.1 - expected.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_target_capped_and_scan_stops_early() {
        let samples = generate_samples(&unit_square(), 5).unwrap();
        // side = ceil(sqrt(5)) = 3, but only the first five interior
        // centers are kept
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[4], (0.5, 0.5));
    }

    #[test]
    fn test_target_clamped_to_hard_cap() {
        let samples = generate_samples(&unit_square(), 500).unwrap();
        assert_eq!(samples.len(), MAX_SAMPLES);
    }

    #[test]
    fn test_zero_target_clamped_to_one() {
        let samples = generate_samples(&unit_square(), 0).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_degenerate_polygon_falls_back_to_centroid() {
        // Zero bounding-box width: a vertical segment
        let ring = vec![(3.0, 1.0), (3.0, 2.0), (3.0, 4.0)];
        let samples = generate_samples(&ring, 9).unwrap();
        assert_eq!(samples, vec![(7.0 / 3.0, 3.0)]);
    }

    #[test]
    fn test_polygon_thinner_than_grid_falls_back_to_centroid() {
        // A thin chevron band whose interior misses every 2x2 cell center
        let ring = vec![
            (0.0, 0.0),
            (5.0, 4.8),
            (10.0, 0.0),
            (10.0, 0.4),
            (5.0, 5.2),
            (0.0, 0.4),
        ];
        let samples = generate_samples(&ring, 4).unwrap();
        assert_eq!(samples.len(), 1);
        let (lat, lon) = samples[0];
        assert!((lon - 5.0).abs() < 1e-9);
        assert!((lat - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_empty_ring_rejected() {
        let err = generate_samples(&[], 4).unwrap_err();
        assert!(matches!(err, AggregationError::InvalidPolygon(_)));
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let ring = vec![(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)];
        let err = generate_samples(&ring, 4).unwrap_err();
        assert!(matches!(err, AggregationError::InvalidPolygon(_)));
    }

    #[test]
    fn test_triangle_keeps_only_interior_centers() {
        // Right triangle covering the lower-left half of the unit square
        let ring = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        let samples = generate_samples(&ring, 9).unwrap();
        assert!(!samples.is_empty());
        assert!(samples.len() < 9);
        for &(lat, lon) in &samples {
            assert!(point_in_polygon(lon, lat, &ring));
        }
    }
}
