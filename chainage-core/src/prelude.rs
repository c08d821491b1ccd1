pub use crate::Meters;

// Re-export key components
pub use crate::annotation::{CaptureAnnotation, format_chainage, format_coordinate};
pub use crate::chainage::{
    ChainageCalculator, DEFAULT_SNAP_TOLERANCE_METERS, compute_chainage, compute_chainages,
};
pub use crate::error::Error;
pub use crate::loading::{
    ChainageConfig, DEFAULT_SEARCH_RADIUS_METERS, OverpassResponse, Road, overpass_query,
    polyline_from_geojson, polyline_from_geojson_str, road_from_overpass, road_from_overpass_str,
};
pub use crate::metric::{
    SegmentProjection, great_circle_distance, point_to_segment_distance, project_onto_segment,
};
pub use crate::model::{ChainageResult, GeoPoint, Polyline, SegmentSnap};
