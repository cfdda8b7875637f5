//! Error taxonomy.
//!
//! Schema errors abort the pass. Row errors exclude one row and are tallied.
//! Classification misses are not errors at all; they fall back to
//! `Other Armed Groups`.

use serde::Serialize;
use thiserror::Error;

/// A source is unusable as a whole.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("source {source_name:?} is missing required column {column:?}")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },
    #[error("source {0:?} has no header row")]
    EmptyHeader(String),
}

/// Why a single row was excluded during ingestion.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowError {
    #[error("row could not be decoded")]
    Unreadable,
    #[error("event_date is empty")]
    MissingEventDate,
    #[error("event_date is not a recognised date")]
    MalformedEventDate,
    #[error("event_date falls outside the corpus window")]
    DateOutsideWindow,
    #[error("fatalities is empty")]
    MissingFatalities,
    #[error("fatalities is not an integer")]
    MalformedFatalities,
    #[error("fatalities is negative")]
    NegativeFatalities,
    #[error("geo_precision is empty")]
    MissingGeoPrecision,
    #[error("geo_precision is not an integer")]
    MalformedGeoPrecision,
    #[error("geo_precision is not one of 1, 2, 3")]
    OutOfRangeGeoPrecision,
    #[error("latitude/longitude is not a valid coordinate")]
    MalformedCoordinate,
}

/// A taxonomy table could not be loaded or compiled.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("taxonomy: {0}")]
    Config(#[from] config::ConfigError),
    #[error("taxonomy version must not be empty")]
    MissingVersion,
    #[error("rule {index}: empty pattern")]
    EmptyPattern { index: usize },
    #[error("rule {index}: unknown bucket label {label:?}")]
    UnknownBucket { index: usize, label: String },
    #[error("rule {index}: invalid regex {pattern:?}")]
    InvalidRegex {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
