//! Spatial aggregates. Both layers go through [`GeoPolicy`]: region tallies
//! at [`MapScale::Region`], hotspots at [`MapScale::Point`].

use std::collections::BTreeMap;

use ced_core::{ActorBucket, GeoPolicy, MapScale, NormalizedEvent, Placement};
use chrono::NaiveDate;
use serde::Serialize;

use crate::temporal::event_type_of;

/// Provider admin-1 spellings mapped onto the boundary file's names.
const ADMIN1_CORRECTIONS: [(&str, &str); 2] = [("Al Jazirah", "Gezira"), ("Al Qadarif", "Gedaref")];

pub fn correct_admin1(name: &str) -> &str {
    ADMIN1_CORRECTIONS
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .unwrap_or(name)
}

// ---------------------------------------------------------------------------
// Region tallies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub events: usize,
    pub fatalities: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionTallies {
    pub regions: Vec<RegionCount>,
    /// Region-scale records with no admin-1 name.
    pub without_region: usize,
}

pub fn region_tallies(events: &[NormalizedEvent], policy: &GeoPolicy) -> RegionTallies {
    let mut by_region: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
    let mut without_region = 0;
    for e in events {
        if !policy
            .placement(Some(e.event.geo_precision), MapScale::Region)
            .is_included()
        {
            continue;
        }
        match e.event.context.admin1.as_deref() {
            Some(name) => {
                let slot = by_region.entry(correct_admin1(name)).or_default();
                slot.0 += 1;
                slot.1 += u64::from(e.event.fatalities);
            }
            None => without_region += 1,
        }
    }

    RegionTallies {
        regions: by_region
            .into_iter()
            .map(|(region, (events, fatalities))| RegionCount {
                region: region.to_string(),
                events,
                fatalities,
            })
            .collect(),
        without_region,
    }
}

// ---------------------------------------------------------------------------
// Hotspots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub event_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub fatalities: u32,
    pub weight: f64,
    pub actor_bucket: ActorBucket,
    pub event_type: String,
}

/// How the point layer treated the table. `full_weight`, `reduced_weight`,
/// `unplottable` and `excluded` partition `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointCoverage {
    pub total: usize,
    /// Plotted at weight 1.
    pub full_weight: usize,
    /// Plotted at a reduced weight.
    pub reduced_weight: usize,
    /// Admitted by the policy but missing coordinates.
    pub unplottable: usize,
    pub excluded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotLayer {
    pub coverage: PointCoverage,
    pub hotspots: Vec<Hotspot>,
}

/// The `limit` highest-fatality records that the point layer admits and that
/// carry coordinates. Ties keep table order.
pub fn hotspots(events: &[NormalizedEvent], policy: &GeoPolicy, limit: usize) -> HotspotLayer {
    let mut coverage = PointCoverage {
        total: events.len(),
        ..PointCoverage::default()
    };
    let mut candidates = Vec::new();

    for e in events {
        let weight = match policy.placement(Some(e.event.geo_precision), MapScale::Point) {
            Placement::Exclude => {
                coverage.excluded += 1;
                continue;
            }
            Placement::Include { weight } => weight,
        };
        let (Some(latitude), Some(longitude)) = (e.event.latitude, e.event.longitude) else {
            coverage.unplottable += 1;
            continue;
        };
        if weight >= 1.0 {
            coverage.full_weight += 1;
        } else {
            coverage.reduced_weight += 1;
        }
        candidates.push(Hotspot {
            event_date: e.event.event_date,
            latitude,
            longitude,
            fatalities: e.event.fatalities,
            weight,
            actor_bucket: e.actor_bucket,
            event_type: event_type_of(e).to_string(),
        });
    }

    candidates.sort_by(|a, b| b.fatalities.cmp(&a.fatalities));
    candidates.truncate(limit);

    tracing::debug!(
        plotted = coverage.full_weight + coverage.reduced_weight,
        unplottable = coverage.unplottable,
        excluded = coverage.excluded,
        "point layer coverage"
    );
    HotspotLayer {
        coverage,
        hotspots: candidates,
    }
}
