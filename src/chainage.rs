use chainage_core::prelude::*;
use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::gen_stub_pyfunction;

use crate::route::{PyRoute, to_geo_point, to_py_err};

/// Compute the chainage of a point along a route
///
/// Parameters
/// ----------
/// route : Route
///     Road centerline, measured from its first point
/// lat, lon : float
///     Observed position in WGS84 degrees
/// snap_tolerance : float, default=50.0
///     Maximum distance in meters between the point and a segment for the
///     point to count as lying on it
///
/// Returns
/// -------
/// float
///     Distance in meters along the route. 0 for routes with fewer than two
///     points; the full route length if no segment is within tolerance.
///
/// Raises
/// ------
/// ValueError
///     If the coordinates are out of range
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "compute_chainage")]
#[pyo3(signature = (route, lat, lon, snap_tolerance = DEFAULT_SNAP_TOLERANCE_METERS))]
pub fn py_compute_chainage(
    route: &PyRoute,
    lat: f64,
    lon: f64,
    snap_tolerance: f64,
) -> PyResult<f64> {
    route.chainage(lat, lon, snap_tolerance)
}

/// Compute chainages of many points along one route
///
/// The work is spread across threads and the GIL is released while it
/// runs. Results are returned in input order.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (route, points, snap_tolerance = DEFAULT_SNAP_TOLERANCE_METERS))]
pub fn compute_chainages(
    py: Python<'_>,
    route: &PyRoute,
    points: Vec<(f64, f64)>,
    snap_tolerance: f64,
) -> PyResult<Vec<f64>> {
    let observed = points
        .iter()
        .map(|&(lat, lon)| to_geo_point(lat, lon))
        .collect::<PyResult<Vec<_>>>()?;
    let polyline = route.inner.clone();

    let results: Vec<f64> = py.detach(|| {
        chainage_core::compute_chainages(&polyline, &observed, snap_tolerance)
            .into_iter()
            .map(|result| result.distance_meters)
            .collect()
    });

    Ok(results)
}

/// Great-circle distance in meters between two ``(lat, lon)`` positions
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "great_circle_distance")]
pub fn py_great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> PyResult<f64> {
    Ok(great_circle_distance(
        to_geo_point(lat1, lon1)?,
        to_geo_point(lat2, lon2)?,
    ))
}

/// Distance in meters from a point to a segment, clamped to its endpoints
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "point_to_segment_distance")]
pub fn py_point_to_segment_distance(
    point: (f64, f64),
    segment_start: (f64, f64),
    segment_end: (f64, f64),
) -> PyResult<f64> {
    Ok(point_to_segment_distance(
        to_geo_point(point.0, point.1)?,
        to_geo_point(segment_start.0, segment_start.1)?,
        to_geo_point(segment_end.0, segment_end.1)?,
    ))
}

/// Build a Route from an Overpass API ``out geom`` JSON response
///
/// The first way with geometry is used.
///
/// Raises
/// ------
/// ValueError
///     If the JSON is malformed or contains no roads
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
pub fn route_from_overpass(json: &str) -> PyResult<PyRoute> {
    let road = road_from_overpass_str(json).map_err(to_py_err)?;
    log::debug!("Loaded road {} ({:?})", road.id, road.name);
    Ok(PyRoute {
        inner: road.geometry,
    })
}

/// Build a Route from a GeoJSON LineString, Feature or FeatureCollection
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
pub fn route_from_geojson(json: &str) -> PyResult<PyRoute> {
    Ok(PyRoute {
        inner: polyline_from_geojson_str(json).map_err(to_py_err)?,
    })
}

/// Overpass QL query for highways around a position
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (lat, lon, radius = DEFAULT_SEARCH_RADIUS_METERS))]
pub fn nearby_roads_query(lat: f64, lon: f64, radius: f64) -> String {
    overpass_query(lat, lon, radius)
}

/// Format a chainage in meters as kilometres, e.g. ``"1.235 km"``
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "format_chainage")]
pub fn py_format_chainage(meters: f64) -> String {
    format_chainage(meters)
}

/// Format a coordinate with four decimals
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "format_coordinate")]
pub fn py_format_coordinate(value: f64) -> String {
    format_coordinate(value)
}
