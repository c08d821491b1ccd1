//! Distances on a spherical Earth.
//!
//! Point to point distances use the haversine formula. Point to segment
//! distances project the segment into a local equirectangular plane
//! centred on the observed point, clamp the perpendicular foot to the
//! segment there, and measure the great-circle distance to that foot.
//! For road segments (tens to hundreds of meters) the planar error is
//! far below GPS noise.

use geo::{Coord, Distance, Haversine, Line, Point};

use crate::{GeoPoint, Meters};

/// Cosine floor used near the poles, where longitude degrees collapse.
const MIN_COS_LATITUDE: f64 = 1e-9;

/// Great-circle distance between two points in meters
pub fn great_circle_distance(a: GeoPoint, b: GeoPoint) -> Meters {
    Haversine.distance(Point::from(a), Point::from(b))
}

/// Distance from `p` to the segment `[segment_start, segment_end]` in meters,
/// clamped to the segment endpoints.
pub fn point_to_segment_distance(
    p: GeoPoint,
    segment_start: GeoPoint,
    segment_end: GeoPoint,
) -> Meters {
    project_onto_segment(p, segment_start, segment_end).distance_meters
}

/// Projection of a point onto a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest point of the segment
    pub foot: GeoPoint,
    /// Position of `foot` along the segment, in `[0, 1]`
    pub fraction: f64,
    pub distance_meters: Meters,
}

pub fn project_onto_segment(
    p: GeoPoint,
    segment_start: GeoPoint,
    segment_end: GeoPoint,
) -> SegmentProjection {
    let cos_lat = p.latitude.to_radians().cos().max(MIN_COS_LATITUDE);

    // Observed point is the origin of the local plane
    let segment = Line::new(
        to_local(p, segment_start, cos_lat),
        to_local(p, segment_end, cos_lat),
    );
    let fraction = clamped_fraction(&segment);

    let foot_local = segment.start + segment.delta() * fraction;
    let foot = GeoPoint::new(
        p.latitude + foot_local.y,
        normalize_longitude(p.longitude + foot_local.x / cos_lat),
    );

    SegmentProjection {
        foot,
        fraction,
        distance_meters: great_circle_distance(p, foot),
    }
}

/// Degrees north/east of `origin`, with longitude scaled to the local parallel.
fn to_local(origin: GeoPoint, point: GeoPoint, cos_lat: f64) -> Coord<f64> {
    Coord {
        x: normalize_longitude(point.longitude - origin.longitude) * cos_lat,
        y: point.latitude - origin.latitude,
    }
}

/// Fraction along `segment` of the point nearest to the origin.
fn clamped_fraction(segment: &Line<f64>) -> f64 {
    let delta = segment.delta();
    let length_squared = delta.x * delta.x + delta.y * delta.y;
    if length_squared == 0.0 {
        return 0.0;
    }

    let t = -(segment.start.x * delta.x + segment.start.y * delta.y) / length_squared;
    t.clamp(0.0, 1.0)
}

fn normalize_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}
