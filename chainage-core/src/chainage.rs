//! Chainage: distance along a road from its first point to an observation.
//!
//! Segments are scanned from the start of the route. The first segment
//! closer to the observation than the snap tolerance wins, even if a
//! later segment is nearer. On routes that double back on themselves
//! (switchbacks, loops) this can attribute the observation to the
//! earlier pass.

use log::{debug, trace};
use rayon::prelude::*;

use crate::loading::ChainageConfig;
use crate::metric::{great_circle_distance, point_to_segment_distance};
use crate::{ChainageResult, Error, GeoPoint, Meters, Polyline, SegmentSnap};

pub const DEFAULT_SNAP_TOLERANCE_METERS: Meters = 50.0;

/// Computes the chainage of `observed` along `route`.
///
/// Routes with fewer than two points yield 0. When no segment lies
/// within `snap_tolerance_meters` the whole route length is returned.
pub fn compute_chainage(
    route: &Polyline,
    observed: GeoPoint,
    snap_tolerance_meters: Meters,
) -> ChainageResult {
    if route.len() < 2 {
        return ChainageResult::ZERO;
    }

    let mut total = 0.0;
    for (segment_index, (start, end)) in route.segments().enumerate() {
        let offset = point_to_segment_distance(observed, start, end);
        if offset < snap_tolerance_meters {
            total += great_circle_distance(start, observed);
            trace!(
                "Point snapped to segment {segment_index} ({offset:.1} m off), chainage {total:.1} m"
            );
            return ChainageResult {
                distance_meters: total,
                snap: Some(SegmentSnap {
                    segment_index,
                    offset_meters: offset,
                }),
            };
        }

        total += great_circle_distance(start, end);
    }

    debug!(
        "No segment within {snap_tolerance_meters} m of {observed:?}, using full route length {total:.1} m"
    );
    ChainageResult {
        distance_meters: total,
        snap: None,
    }
}

/// Computes chainages for many observations against one route.
///
/// Results are in the same order as `observed`.
pub fn compute_chainages(
    route: &Polyline,
    observed: &[GeoPoint],
    snap_tolerance_meters: Meters,
) -> Vec<ChainageResult> {
    observed
        .par_iter()
        .map(|&point| compute_chainage(route, point, snap_tolerance_meters))
        .collect()
}

/// Chainage calculation with a fixed, validated snap tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainageCalculator {
    snap_tolerance_meters: Meters,
}

impl Default for ChainageCalculator {
    fn default() -> Self {
        Self {
            snap_tolerance_meters: DEFAULT_SNAP_TOLERANCE_METERS,
        }
    }
}

impl ChainageCalculator {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the tolerance is negative or not finite.
    pub fn new(snap_tolerance_meters: Meters) -> Result<Self, Error> {
        if !snap_tolerance_meters.is_finite() || snap_tolerance_meters < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "snap tolerance must be a non-negative number of meters, got {snap_tolerance_meters}"
            )));
        }
        Ok(Self {
            snap_tolerance_meters,
        })
    }

    pub fn from_config(config: &ChainageConfig) -> Result<Self, Error> {
        Self::new(config.snap_tolerance_meters)
    }

    pub fn snap_tolerance_meters(&self) -> Meters {
        self.snap_tolerance_meters
    }

    pub fn compute(&self, route: &Polyline, observed: GeoPoint) -> ChainageResult {
        compute_chainage(route, observed, self.snap_tolerance_meters)
    }

    pub fn compute_many(&self, route: &Polyline, observed: &[GeoPoint]) -> Vec<ChainageResult> {
        compute_chainages(route, observed, self.snap_tolerance_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meridian() -> Polyline {
        Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.002, 0.0),
        ])
    }

    #[test]
    fn degenerate_routes_yield_zero() {
        let p = GeoPoint::new(0.0, 0.0);
        assert_eq!(compute_chainage(&Polyline::default(), p, 50.0), ChainageResult::ZERO);

        let single = Polyline::new(vec![p]);
        assert_eq!(compute_chainage(&single, p, 50.0), ChainageResult::ZERO);
    }

    #[test]
    fn reports_snapped_segment() {
        let result = compute_chainage(&meridian(), GeoPoint::new(0.0015, 0.0), 50.0);
        let snap = result.snap.unwrap();
        assert_eq!(snap.segment_index, 1);
        assert!(snap.offset_meters < 1e-6);
    }

    #[test]
    fn fallback_has_no_snap() {
        let far = GeoPoint::new(0.001, 0.01);
        let result = compute_chainage(&meridian(), far, 50.0);
        assert!(!result.is_snapped());
        assert!((result.distance_meters - meridian().length_meters()).abs() < 1e-9);
    }

    #[test]
    fn tolerance_is_strict() {
        // Exactly on the segment with zero tolerance: 0 < 0 is false
        let result = compute_chainage(&meridian(), GeoPoint::new(0.0005, 0.0), 0.0);
        assert!(!result.is_snapped());
    }

    #[test]
    fn nan_tolerance_never_snaps() {
        let result = compute_chainage(&meridian(), GeoPoint::new(0.0, 0.0), f64::NAN);
        assert!(!result.is_snapped());
    }

    #[test]
    fn calculator_validates_tolerance() {
        assert!(ChainageCalculator::new(0.0).is_ok());
        assert!(matches!(
            ChainageCalculator::new(-1.0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(ChainageCalculator::new(f64::INFINITY).is_err());
        assert_eq!(
            ChainageCalculator::default().snap_tolerance_meters(),
            DEFAULT_SNAP_TOLERANCE_METERS
        );
    }

    #[test]
    fn bulk_preserves_order() {
        let route = meridian();
        let points = vec![
            GeoPoint::new(0.002, 0.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0015, 0.0),
        ];
        let calculator = ChainageCalculator::default();
        let bulk = calculator.compute_many(&route, &points);
        let single: Vec<_> = points.iter().map(|&p| calculator.compute(&route, p)).collect();
        assert_eq!(bulk, single);
    }
}
