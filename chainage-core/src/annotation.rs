//! Annotation of a captured photo with where it was taken.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{ChainageCalculator, GeoPoint, Meters, Polyline};

pub const UNKNOWN_ADDRESS: &str = "Unknown address";
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";

/// Location metadata attached to a capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureAnnotation {
    pub location: GeoPoint,
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub chainage_meters: Meters,
}

impl CaptureAnnotation {
    /// Annotates a capture taken at `location`.
    ///
    /// Without a road the chainage is 0; without an address the
    /// placeholder [`UNKNOWN_ADDRESS`] is used.
    pub fn annotate(
        location: GeoPoint,
        route: Option<&Polyline>,
        address: Option<String>,
        calculator: &ChainageCalculator,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let chainage_meters = match route {
            Some(route) if !route.is_empty() => calculator.compute(route, location).distance_meters,
            _ => {
                warn!("No road route available. Chainage will be 0.");
                0.0
            }
        };

        Self {
            location,
            address: address.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            timestamp,
            chainage_meters,
        }
    }

    /// Placeholder for a capture whose position could not be determined
    pub fn unavailable(timestamp: DateTime<Utc>) -> Self {
        Self {
            location: GeoPoint::new(0.0, 0.0),
            address: LOCATION_UNAVAILABLE.to_string(),
            timestamp,
            chainage_meters: 0.0,
        }
    }

    pub fn formatted_chainage(&self) -> String {
        format_chainage(self.chainage_meters)
    }
}

/// Formats a chainage in kilometres with three decimals, e.g. `1,234.567 km`.
pub fn format_chainage(meters: Meters) -> String {
    format!("{} km", group_thousands(&format!("{:.3}", meters / 1000.0)))
}

/// Formats a coordinate with four decimals.
pub fn format_coordinate(value: f64) -> String {
    group_thousands(&format!("{value:.4}"))
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}
