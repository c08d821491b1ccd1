use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::define_stub_info_gatherer;

use chainage::{
    compute_chainages, nearby_roads_query, py_compute_chainage, py_format_chainage,
    py_format_coordinate, py_great_circle_distance, py_point_to_segment_distance,
    route_from_geojson, route_from_overpass,
};
use route::PyRoute;

pub mod chainage;
pub mod route;

/// A Python module implemented in Rust.
#[pymodule]
#[pyo3(name = "chainage")]
fn chainage_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyRoute>()?;
    m.add_function(wrap_pyfunction!(py_compute_chainage, m)?)?;
    m.add_function(wrap_pyfunction!(compute_chainages, m)?)?;

    m.add_function(wrap_pyfunction!(py_great_circle_distance, m)?)?;
    m.add_function(wrap_pyfunction!(py_point_to_segment_distance, m)?)?;

    m.add_function(wrap_pyfunction!(route_from_overpass, m)?)?;
    m.add_function(wrap_pyfunction!(route_from_geojson, m)?)?;
    m.add_function(wrap_pyfunction!(nearby_roads_query, m)?)?;

    m.add_function(wrap_pyfunction!(py_format_chainage, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_coordinate, m)?)?;
    Ok(())
}

#[cfg(feature = "stubgen")]
define_stub_info_gatherer!(stub_info);
