use serde::{Deserialize, Serialize};

use crate::{DEFAULT_SNAP_TOLERANCE_METERS, Error, Meters};

/// Settings for chainage calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainageConfig {
    /// Maximum distance from a segment for an observation to snap to it
    pub snap_tolerance_meters: Meters,
}

impl Default for ChainageConfig {
    fn default() -> Self {
        Self {
            snap_tolerance_meters: DEFAULT_SNAP_TOLERANCE_METERS,
        }
    }
}

impl ChainageConfig {
    /// # Errors
    ///
    /// Returns an error if the snap tolerance is negative or not finite
    pub fn validate(&self) -> Result<(), Error> {
        if !self.snap_tolerance_meters.is_finite() || self.snap_tolerance_meters < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "snap_tolerance_meters must be a non-negative number, got {}",
                self.snap_tolerance_meters
            )));
        }
        Ok(())
    }
}
