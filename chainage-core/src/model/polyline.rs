use geo::{Coord, LineString};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Meters, metric::great_circle_distance};

use super::GeoPoint;

/// Road centerline as an ordered sequence of points.
///
/// Direction matters: chainage is measured from the first point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consecutive point pairs, from the start of the line.
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.points.iter().copied().tuple_windows::<(GeoPoint, GeoPoint)>()
    }

    /// Sum of great-circle segment lengths
    pub fn length_meters(&self) -> Meters {
        self.segments()
            .map(|(start, end)| great_circle_distance(start, end))
            .sum()
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.points.iter().rev().copied().collect())
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.points.iter().map(|&p| Coord::from(p)).collect())
    }
}

impl From<Vec<GeoPoint>> for Polyline {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<GeoPoint> for Polyline {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<&LineString<f64>> for Polyline {
    fn from(line: &LineString<f64>) -> Self {
        line.coords().map(|&c| GeoPoint::from(c)).collect()
    }
}

impl From<LineString<f64>> for Polyline {
    fn from(line: LineString<f64>) -> Self {
        Self::from(&line)
    }
}
