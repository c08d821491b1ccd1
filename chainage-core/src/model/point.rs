use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::Error;

/// WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a point, rejecting non-finite or out of range coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] when latitude is outside
    /// `[-90, 90]` or longitude outside `[-180, 180]`.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        let point = Self::new(latitude, longitude);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(value: GeoPoint) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(value: Point<f64>) -> Self {
        GeoPoint::new(value.y(), value.x())
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(value: GeoPoint) -> Self {
        Coord {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(value: Coord<f64>) -> Self {
        GeoPoint::new(value.y, value.x)
    }
}
