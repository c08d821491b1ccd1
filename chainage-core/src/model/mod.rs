//! Data model for chainage calculation
//!
//! Geographic points, road polylines and the result of projecting an
//! observation onto a road.

pub mod point;
pub mod polyline;
pub mod result;

pub use point::GeoPoint;
pub use polyline::Polyline;
pub use result::{ChainageResult, SegmentSnap};
