//! Road geometry from the Overpass API
//!
//! Only the data format is handled here: building the query text and
//! reading an `out geom` JSON response. Sending the request is up to
//! the caller.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, GeoPoint, Meters, Polyline};

pub const DEFAULT_SEARCH_RADIUS_METERS: Meters = 1000.0;

/// Overpass QL selecting highway ways within `radius_meters` of a point,
/// with their full geometry inlined.
pub fn overpass_query(latitude: f64, longitude: f64, radius_meters: Meters) -> String {
    format!(
        "[out:json];\nway[\"highway\"](around:{radius_meters},{latitude},{longitude});\nout geom;"
    )
}

/// JSON body of an Overpass response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub geometry: Vec<OverpassCoordinate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OverpassCoordinate {
    pub lat: f64,
    pub lon: f64,
}

/// A road picked from an Overpass response
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub id: i64,
    pub name: Option<String>,
    /// Value of the `highway` tag, e.g. `residential`
    pub highway: Option<String>,
    pub geometry: Polyline,
}

/// Takes the first element with geometry, in response order.
///
/// # Errors
///
/// [`Error::NoRoadsFound`] if no element carries geometry,
/// [`Error::InvalidCoordinate`] if a vertex is out of range.
pub fn road_from_overpass(response: &OverpassResponse) -> Result<Road, Error> {
    let element = response
        .elements
        .iter()
        .find(|element| !element.geometry.is_empty())
        .ok_or(Error::NoRoadsFound)?;

    let geometry = element
        .geometry
        .iter()
        .map(|c| GeoPoint::try_new(c.lat, c.lon))
        .collect::<Result<Polyline, _>>()?;

    debug!(
        "Picked way {} with {} points out of {} elements",
        element.id,
        geometry.len(),
        response.elements.len()
    );

    Ok(Road {
        id: element.id,
        name: element.tags.get("name").cloned(),
        highway: element.tags.get("highway").cloned(),
        geometry,
    })
}

pub fn road_from_overpass_str(json: &str) -> Result<Road, Error> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    road_from_overpass(&response)
}
