//! ced-report: figure-ready aggregates over the normalized table.
//!
//! Figure generation reads these datasets instead of re-deriving anything
//! from the canonical table. Each dataset is written as one pretty-printed
//! JSON file in the report directory:
//!
//! | file | dataset |
//! |------|---------|
//! | `monthly_fatalities.json` | [`temporal::monthly_fatalities`] |
//! | `event_composition.json` | [`temporal::event_composition`] |
//! | `actor_timelines.json` | [`temporal::actor_timelines`] |
//! | `actor_event_distribution.json` | [`actors::actor_event_distribution`] |
//! | `region_tallies.json` | [`spatial::region_tallies`] |
//! | `hotspots.json` | [`spatial::hotspots`] |
//! | `source_scale_shift.json` | [`coverage::source_scale_shift`] |
//! | `timelapse.json` | [`timelapse::timelapse`] |
//! | `validation.json` | [`validation::validate`] (written by the caller) |

pub mod actors;
pub mod coverage;
pub mod month;
pub mod spatial;
pub mod temporal;
pub mod timelapse;
pub mod validation;

use std::fs;
use std::path::{Path, PathBuf};

use ced_core::config::ReportConfig;
use ced_core::{GeoPolicy, NormalizedEvent};
use serde::Serialize;
use thiserror::Error;

pub use month::Month;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Every aggregate dataset, built in one pass over the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub monthly_fatalities: Vec<temporal::MonthlyFatalities>,
    pub event_composition: Vec<temporal::CompositionRow>,
    pub actor_timelines: Vec<temporal::ActorTimeline>,
    pub actor_event_distribution: Vec<actors::ActorEventDistribution>,
    pub region_tallies: spatial::RegionTallies,
    pub hotspots: spatial::HotspotLayer,
    pub source_scale_shift: Vec<coverage::ScaleShare>,
    pub timelapse: timelapse::TimelapseLayer,
}

impl Report {
    pub fn build(events: &[NormalizedEvent], settings: &ReportConfig, geo: &GeoPolicy) -> Self {
        Self {
            monthly_fatalities: temporal::monthly_fatalities(events, settings.rolling_window),
            event_composition: temporal::event_composition(events, settings.composition_window),
            actor_timelines: temporal::actor_timelines(events, settings.timeline_window),
            actor_event_distribution: actors::actor_event_distribution(events),
            region_tallies: spatial::region_tallies(events, geo),
            hotspots: spatial::hotspots(events, geo, settings.hotspot_limit),
            source_scale_shift: coverage::source_scale_shift(events, settings.top_source_scales),
            timelapse: timelapse::timelapse(events),
        }
    }

    /// Write one JSON file per dataset into `dir`, returning the paths in
    /// write order.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        Ok(vec![
            write_json(dir, "monthly_fatalities.json", &self.monthly_fatalities)?,
            write_json(dir, "event_composition.json", &self.event_composition)?,
            write_json(dir, "actor_timelines.json", &self.actor_timelines)?,
            write_json(dir, "actor_event_distribution.json", &self.actor_event_distribution)?,
            write_json(dir, "region_tallies.json", &self.region_tallies)?,
            write_json(dir, "hotspots.json", &self.hotspots)?,
            write_json(dir, "source_scale_shift.json", &self.source_scale_shift)?,
            write_json(dir, "timelapse.json", &self.timelapse)?,
        ])
    }
}

/// Pretty-print `value` to `dir/name`, creating `dir` if needed.
pub fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(name);
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut body = serde_json::to_string_pretty(value).map_err(|source| ReportError::Json {
        path: path.clone(),
        source,
    })?;
    body.push('\n');
    fs::write(&path, body).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote report dataset");
    Ok(path)
}
