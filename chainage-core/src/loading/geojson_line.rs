use geo::{Geometry, LineString};
use geojson::{GeoJson, Value as GeoJsonValue};

use crate::{Error, GeoPoint, Polyline};

/// Reads a road centerline from GeoJSON.
///
/// Accepts a bare geometry, a feature or a feature collection. The first
/// `LineString` found is used; for a `MultiLineString` its first part.
///
/// # Errors
///
/// Returns an error if no line geometry is present or a vertex is out of range.
pub fn polyline_from_geojson(geojson: &GeoJson) -> Result<Polyline, Error> {
    let line = match geojson {
        GeoJson::Geometry(geometry) => line_from_value(&geometry.value),
        GeoJson::Feature(feature) => feature
            .geometry
            .as_ref()
            .and_then(|geometry| line_from_value(&geometry.value)),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .find_map(|geometry| line_from_value(&geometry.value)),
    }
    .ok_or_else(|| Error::InvalidData("GeoJSON contains no LineString geometry".to_string()))?;

    line.coords()
        .map(|c| GeoPoint::try_new(c.y, c.x))
        .collect()
}

pub fn polyline_from_geojson_str(json: &str) -> Result<Polyline, Error> {
    let geojson = json
        .parse::<GeoJson>()
        .map_err(|e| Error::GeoJsonError(e.to_string()))?;
    polyline_from_geojson(&geojson)
}

fn line_from_value(value: &GeoJsonValue) -> Option<LineString<f64>> {
    match Geometry::<f64>::try_from(value.clone()).ok()? {
        Geometry::LineString(line) => Some(line),
        Geometry::MultiLineString(lines) => lines.0.into_iter().next(),
        _ => None,
    }
}
