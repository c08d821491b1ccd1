use serde::{Deserialize, Serialize};

use crate::Meters;

/// Outcome of a chainage calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainageResult {
    /// Distance along the route from its first point, never negative
    pub distance_meters: Meters,
    /// Segment the observation snapped to, `None` when nothing qualified
    pub snap: Option<SegmentSnap>,
}

impl ChainageResult {
    pub const ZERO: Self = Self {
        distance_meters: 0.0,
        snap: None,
    };

    pub fn is_snapped(&self) -> bool {
        self.snap.is_some()
    }
}

/// Segment `segment_index` joins `route[segment_index]` and `route[segment_index + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSnap {
    pub segment_index: usize,
    /// Distance from the observation to the segment
    pub offset_meters: Meters,
}
