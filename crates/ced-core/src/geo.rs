//! Geo-precision placement policy.
//!
//! Decides whether, and with what weight, a record contributes to a spatial
//! layer at a given [`MapScale`]. Region-only records never appear as points;
//! region tallies still count them.

use serde::{Deserialize, Serialize};

use crate::types::GeoPrecision;

/// Spatial resolution of the consuming layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapScale {
    /// Individual plotted points.
    Point,
    /// Counts per administrative region.
    Region,
}

/// Outcome of the policy for one record at one scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "placement", rename_all = "snake_case")]
pub enum Placement {
    Include { weight: f64 },
    Exclude,
}

impl Placement {
    pub fn is_included(self) -> bool {
        matches!(self, Placement::Include { .. })
    }

    /// Weight of the record in the layer; zero when excluded.
    pub fn weight(self) -> f64 {
        match self {
            Placement::Include { weight } => weight,
            Placement::Exclude => 0.0,
        }
    }
}

/// Placement policy. `near_weight` is the visual weight given to tier-2
/// records on point layers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoPolicy {
    #[serde(default = "default_near_weight")]
    pub near_weight: f64,
}

fn default_near_weight() -> f64 {
    0.5
}

impl Default for GeoPolicy {
    fn default() -> Self {
        Self {
            near_weight: default_near_weight(),
        }
    }
}

impl GeoPolicy {
    /// Placement for a known tier, or `None` for a code outside the
    /// vocabulary. Unknown codes get the most restrictive treatment.
    pub fn placement(&self, precision: Option<GeoPrecision>, scale: MapScale) -> Placement {
        match (precision, scale) {
            (Some(GeoPrecision::Exact), _) => Placement::Include { weight: 1.0 },
            (Some(GeoPrecision::Near), MapScale::Point) => Placement::Include {
                weight: self.near_weight,
            },
            (Some(GeoPrecision::Near | GeoPrecision::Region), MapScale::Region) => {
                Placement::Include { weight: 1.0 }
            }
            (Some(GeoPrecision::Region), MapScale::Point) => Placement::Exclude,
            (None, _) => Placement::Exclude,
        }
    }

    /// Same as [`GeoPolicy::placement`] but from a raw provider code.
    pub fn placement_for_code(&self, code: i64, scale: MapScale) -> Placement {
        self.placement(GeoPrecision::from_code(code), scale)
    }
}

/// Tier-1 flag from the cleaning step.
pub fn is_high_geo(precision: GeoPrecision) -> bool {
    precision == GeoPrecision::Exact
}

/// Tier-2-or-worse flag from the cleaning step.
pub fn is_low_geo(precision: GeoPrecision) -> bool {
    precision != GeoPrecision::Exact
}
