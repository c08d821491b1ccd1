use chainage_core::prelude::*;

use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pymethods};

/// Route
///
/// A road centerline given as an ordered list of ``(lat, lon)`` pairs.
/// Chainage is measured from the first point, so the order matters.
///
/// Example:
///
/// .. code-block:: python
///
///     route = Route([(54.300, 10.100), (54.301, 10.100), (54.302, 10.101)])
///     route.chainage(54.3015, 10.1005)
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "Route")]
#[derive(Clone)]
pub struct PyRoute {
    pub(crate) inner: Polyline,
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyRoute {
    #[new]
    pub fn new(points: Vec<(f64, f64)>) -> PyResult<Self> {
        Ok(Self {
            inner: polyline_from_pairs(&points)?,
        })
    }

    /// Total length of the route in meters
    pub fn length_meters(&self) -> f64 {
        self.inner.length_meters()
    }

    /// Chainage of ``(lat, lon)`` in meters
    ///
    /// Segments are scanned from the start; the first one closer than
    /// ``snap_tolerance`` meters is used. When none is, the full route
    /// length is returned.
    #[pyo3(signature = (lat, lon, snap_tolerance = DEFAULT_SNAP_TOLERANCE_METERS))]
    pub fn chainage(&self, lat: f64, lon: f64, snap_tolerance: f64) -> PyResult<f64> {
        let observed = to_geo_point(lat, lon)?;
        Ok(compute_chainage(&self.inner, observed, snap_tolerance).distance_meters)
    }

    /// Index of the segment ``(lat, lon)`` snaps to, or None
    #[pyo3(signature = (lat, lon, snap_tolerance = DEFAULT_SNAP_TOLERANCE_METERS))]
    pub fn snapped_segment(
        &self,
        lat: f64,
        lon: f64,
        snap_tolerance: f64,
    ) -> PyResult<Option<usize>> {
        let observed = to_geo_point(lat, lon)?;
        Ok(compute_chainage(&self.inner, observed, snap_tolerance)
            .snap
            .map(|snap| snap.segment_index))
    }

    /// The same route, traversed from the other end
    pub fn reversed(&self) -> Self {
        Self {
            inner: self.inner.reversed(),
        }
    }

    /// Route points as ``(lat, lon)`` pairs
    #[getter]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.inner
            .points()
            .iter()
            .map(|p| (p.latitude, p.longitude))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Route with {} points, {:.1} m long",
            self.inner.len(),
            self.inner.length_meters()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

pub(crate) fn to_geo_point(lat: f64, lon: f64) -> PyResult<GeoPoint> {
    GeoPoint::try_new(lat, lon).map_err(to_py_err)
}

pub(crate) fn polyline_from_pairs(points: &[(f64, f64)]) -> PyResult<Polyline> {
    points
        .iter()
        .map(|&(lat, lon)| to_geo_point(lat, lon))
        .collect()
}

pub(crate) fn to_py_err(e: Error) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}
