//! Core types for ced-core.
//!
//! This module defines the data structures shared across all stages: the
//! ingested [`EventRecord`], its [`NormalizedEvent`] form carrying the derived
//! columns, and the small closed vocabularies ([`ActorBucket`],
//! [`GeoPrecision`]) the derived columns are drawn from.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::period::Period;

/// Column order of the canonical cleaned table.
pub const CANONICAL_COLUMNS: [&str; 11] = [
    "event_date",
    "actor1",
    "actor2",
    "event_type",
    "sub_event_type",
    "fatalities",
    "latitude",
    "longitude",
    "geo_precision",
    "period",
    "actor_bucket",
];

// ---------------------------------------------------------------------------
// ActorBucket
// ---------------------------------------------------------------------------

/// Coarse actor category a free-text actor name is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActorBucket {
    Saf,
    Rsf,
    ProtestGroups,
    OtherArmedGroups,
}

/// Accepted spellings of each bucket label in taxonomy files. Keys are
/// lowercase; lookups lowercase and trim first.
static BUCKET_LABELS: phf::Map<&'static str, ActorBucket> = phf::phf_map! {
    "saf" => ActorBucket::Saf,
    "sudanese armed forces" => ActorBucket::Saf,
    "rsf" => ActorBucket::Rsf,
    "rapid support forces" => ActorBucket::Rsf,
    "protest groups" => ActorBucket::ProtestGroups,
    "protest_groups" => ActorBucket::ProtestGroups,
    "other armed groups" => ActorBucket::OtherArmedGroups,
    "other_armed_groups" => ActorBucket::OtherArmedGroups,
};

impl ActorBucket {
    /// Every bucket, in reporting order.
    pub const ALL: [ActorBucket; 4] = [
        ActorBucket::Saf,
        ActorBucket::Rsf,
        ActorBucket::ProtestGroups,
        ActorBucket::OtherArmedGroups,
    ];

    /// The label written to the canonical table.
    pub fn label(self) -> &'static str {
        match self {
            ActorBucket::Saf => "SAF",
            ActorBucket::Rsf => "RSF",
            ActorBucket::ProtestGroups => "Protest Groups",
            ActorBucket::OtherArmedGroups => "Other Armed Groups",
        }
    }

    /// Parse a label as written in a taxonomy file.
    pub fn from_label(label: &str) -> Option<Self> {
        BUCKET_LABELS
            .get(label.trim().to_ascii_lowercase().as_str())
            .copied()
    }
}

impl std::fmt::Display for ActorBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

impl Serialize for ActorBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// GeoPrecision
// ---------------------------------------------------------------------------

/// How specific a record's reported location is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoPrecision {
    /// Code 1: the exact location is known.
    Exact,
    /// Code 2: a nearby named location was used.
    Near,
    /// Code 3: only the surrounding region is known.
    Region,
}

impl GeoPrecision {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(GeoPrecision::Exact),
            2 => Some(GeoPrecision::Near),
            3 => Some(GeoPrecision::Region),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            GeoPrecision::Exact => 1,
            GeoPrecision::Near => 2,
            GeoPrecision::Region => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Provenance and context columns kept in memory for aggregation. None of
/// these are written to the canonical table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordContext {
    /// Name of the source extract the row was read from.
    pub source: String,
    /// 1-based data row number within that source.
    pub row: usize,
    pub event_id: Option<String>,
    pub admin1: Option<String>,
    pub source_scale: Option<String>,
    /// Provider date-precision code: 1 for the exact day, 2 for the week,
    /// 3 for the month.
    pub time_precision: Option<u8>,
}

impl RecordContext {
    pub fn is_exact_time(&self) -> bool {
        self.time_precision == Some(1)
    }

    /// Dated to the week or month rather than the day.
    pub fn is_estimated_time(&self) -> bool {
        self.time_precision.is_some_and(|code| code > 1)
    }
}

/// One reported incident as it leaves ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub event_date: NaiveDate,
    pub actor1: Option<String>,
    pub actor2: Option<String>,
    pub event_type: Option<String>,
    pub sub_event_type: Option<String>,
    pub fatalities: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geo_precision: GeoPrecision,
    pub context: RecordContext,
}

/// An [`EventRecord`] with its derived columns attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub event: EventRecord,
    pub period: Period,
    /// Bucket of `actor1`; this is the bucket the record is attributed to.
    pub actor_bucket: ActorBucket,
    /// Bucket of `actor2`, when the record names a second actor.
    pub counterpart_bucket: Option<ActorBucket>,
}

impl NormalizedEvent {
    /// True when either side of the dyad falls in `bucket`.
    pub fn involves(&self, bucket: ActorBucket) -> bool {
        self.actor_bucket == bucket || self.counterpart_bucket == Some(bucket)
    }
}
