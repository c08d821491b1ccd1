//! Road chainage for geotagged observations.
//!
//! Given a road centerline and an observed position, computes how far
//! along the road (from its first vertex) the observation lies. Also
//! carries the data plumbing around that calculation: loading road
//! geometry from Overpass and GeoJSON, and annotating captures.

pub mod annotation;
pub mod chainage;
pub mod error;
pub mod loading;
pub mod metric;
pub mod model;
pub mod prelude;

pub use chainage::{
    ChainageCalculator, DEFAULT_SNAP_TOLERANCE_METERS, compute_chainage, compute_chainages,
};
pub use error::Error;
pub use model::{ChainageResult, GeoPoint, Polyline, SegmentSnap};

/// Distance in meters
pub type Meters = f64;
