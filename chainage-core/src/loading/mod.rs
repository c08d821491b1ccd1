//! This module is responsible for turning road data from external
//! sources (Overpass API responses, GeoJSON) into polylines, and for
//! the calculation configuration.

mod config;
mod geojson_line;
pub mod overpass;

pub use config::ChainageConfig;
pub use geojson_line::{polyline_from_geojson, polyline_from_geojson_str};
pub use overpass::{
    DEFAULT_SEARCH_RADIUS_METERS, OverpassResponse, Road, overpass_query, road_from_overpass,
    road_from_overpass_str,
};
