//! Configuration types for ced.
//!
//! [`Config::load`] layers an optional user file over the built-in defaults.
//! The user file is the one passed on the command line, or
//! `$XDG_CONFIG_HOME/ced/config.toml` when it exists. [`Config::defaults`]
//! returns the same defaults without touching the filesystem (useful in
//! tests).
//!
//! Source lists are not part of the embedded TOML: array entries from layered
//! files are merged by position, so a user file listing fewer sources would
//! silently inherit the tail of the default list. The default sources come
//! from [`default_sources`] instead and are replaced wholesale.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::TaxonomyError;
use crate::geo::GeoPolicy;
use crate::period::CorpusWindow;
use crate::taxonomy::Taxonomy;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[corpus]
start = "2019-04-15"
end   = "2025-01-23"

[output]
cleaned    = "data/cleaned_events.csv"
audit      = "data/actor_audit.csv"
report_dir = "data/report"

[geo]
near_weight = 0.5

[report]
hotspot_limit     = 50
top_source_scales = 5
rolling_window    = 2
timeline_window    = 2
composition_window = 5
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusWindow,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub geo: GeoPolicy,
    #[serde(default)]
    pub report: ReportConfig,
    /// Replacement taxonomy table. The embedded table is used when unset.
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,
}

/// One raw extract in the merge, in the order sources are listed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub path: PathBuf,
    /// Dates this extract was requested for. Rows outside are reported by
    /// validation but not excluded.
    #[serde(default)]
    pub expected_start: Option<NaiveDate>,
    #[serde(default)]
    pub expected_end: Option<NaiveDate>,
}

impl SourceConfig {
    pub fn expects(&self, date: NaiveDate) -> bool {
        self.expected_start.map_or(true, |s| date >= s)
            && self.expected_end.map_or(true, |e| date <= e)
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_cleaned")]
    pub cleaned: PathBuf,
    #[serde(default = "default_audit")]
    pub audit: PathBuf,
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_cleaned() -> PathBuf { PathBuf::from("data/cleaned_events.csv") }
fn default_audit() -> PathBuf { PathBuf::from("data/actor_audit.csv") }
fn default_report_dir() -> PathBuf { PathBuf::from("data/report") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cleaned: default_cleaned(),
            audit: default_audit(),
            report_dir: default_report_dir(),
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_hotspot_limit")]
    pub hotspot_limit: usize,
    #[serde(default = "default_top_source_scales")]
    pub top_source_scales: usize,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    /// Trailing window for the smoothed actor timelines.
    #[serde(default = "default_timeline_window")]
    pub timeline_window: usize,
    /// Centered window for the smoothed composition shares.
    #[serde(default = "default_composition_window")]
    pub composition_window: usize,
}

fn default_hotspot_limit() -> usize { 50 }
fn default_top_source_scales() -> usize { 5 }
fn default_rolling_window() -> usize { 2 }
fn default_timeline_window() -> usize { 2 }
fn default_composition_window() -> usize { 5 }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            hotspot_limit: default_hotspot_limit(),
            top_source_scales: default_top_source_scales(),
            rolling_window: default_rolling_window(),
            timeline_window: default_timeline_window(),
            composition_window: default_composition_window(),
        }
    }
}

/// The three ACLED extracts the report was built from.
pub fn default_sources() -> Vec<SourceConfig> {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
    vec![
        SourceConfig {
            name: "pre_war".to_string(),
            path: PathBuf::from("data/raw/beforeDDay.csv"),
            expected_start: d(2019, 4, 15),
            expected_end: d(2023, 4, 10),
        },
        SourceConfig {
            name: "week_before".to_string(),
            path: PathBuf::from("data/raw/weekBeforeDDay.csv"),
            expected_start: d(2023, 4, 11),
            expected_end: d(2023, 4, 14),
        },
        SourceConfig {
            name: "war_period".to_string(),
            path: PathBuf::from("data/raw/afterDDay.csv"),
            expected_start: d(2023, 4, 15),
            expected_end: None,
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load `path` (or the XDG config file, if present) layered on top of the
    /// built-in defaults. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let user = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(user)
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.corpus.start > self.corpus.end {
            anyhow::bail!(
                "corpus window starts ({}) after it ends ({})",
                self.corpus.start,
                self.corpus.end
            );
        }
        if !(0.0..=1.0).contains(&self.geo.near_weight) {
            anyhow::bail!("geo.near_weight must be within 0..=1, got {}", self.geo.near_weight);
        }
        if self.sources.is_empty() {
            anyhow::bail!("no sources configured");
        }
        for (key, window) in [
            ("rolling_window", self.report.rolling_window),
            ("timeline_window", self.report.timeline_window),
            ("composition_window", self.report.composition_window),
        ] {
            if window == 0 {
                anyhow::bail!("report.{key} must be at least 1");
            }
        }
        Ok(())
    }

    /// The taxonomy this configuration selects.
    pub fn taxonomy(&self) -> Result<Taxonomy, TaxonomyError> {
        match &self.taxonomy_path {
            Some(path) => Taxonomy::load(path),
            None => Ok(Taxonomy::builtin()),
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("ced")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
