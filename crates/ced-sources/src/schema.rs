//! Header standardization and column resolution.
//!
//! Provider exports differ in header casing and separators between pulls.
//! Every header is standardized with [`standardize_header`] before columns
//! are looked up by name, so `EVENT_DATE`, `event date` and `Event-Date` all
//! resolve to `event_date`.

use ced_core::SchemaError;
use csv::StringRecord;

/// Columns a source must carry. Missing any of these aborts the pass.
pub const REQUIRED_COLUMNS: [&str; 3] = ["event_date", "geo_precision", "fatalities"];

/// Columns read when present. Missing ones are logged and read as empty.
pub const OPTIONAL_COLUMNS: [&str; 11] = [
    "actor1",
    "actor2",
    "event_type",
    "sub_event_type",
    "latitude",
    "longitude",
    "event_id_cnty",
    "admin1",
    "source_scale",
    "time_precision",
    "year",
];

/// Trim, drop a UTF-8 byte-order mark, lowercase, and map spaces and dashes
/// to underscores.
pub fn standardize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Field positions of every known column in one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub event_date: usize,
    pub geo_precision: usize,
    pub fatalities: usize,
    pub actor1: Option<usize>,
    pub actor2: Option<usize>,
    pub event_type: Option<usize>,
    pub sub_event_type: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub event_id: Option<usize>,
    pub admin1: Option<usize>,
    pub source_scale: Option<usize>,
    pub time_precision: Option<usize>,
    pub year: Option<usize>,
}

impl ColumnMap {
    /// Resolve columns from a header row. On duplicate headers the first
    /// occurrence wins.
    pub fn resolve(source_name: &str, headers: &StringRecord) -> Result<Self, SchemaError> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(SchemaError::EmptyHeader(source_name.to_string()));
        }

        let names: Vec<String> = headers.iter().map(standardize_header).collect();
        let find = |column: &str| names.iter().position(|n| n == column);
        let require = |column: &'static str| {
            find(column).ok_or_else(|| SchemaError::MissingColumn {
                source_name: source_name.to_string(),
                column,
            })
        };

        let missing: Vec<&str> = OPTIONAL_COLUMNS
            .iter()
            .copied()
            .filter(|c| find(c).is_none())
            .collect();
        if !missing.is_empty() {
            tracing::warn!(source = source_name, ?missing, "optional columns missing, reading as empty");
        }

        Ok(Self {
            event_date: require("event_date")?,
            geo_precision: require("geo_precision")?,
            fatalities: require("fatalities")?,
            actor1: find("actor1"),
            actor2: find("actor2"),
            event_type: find("event_type"),
            sub_event_type: find("sub_event_type"),
            latitude: find("latitude"),
            longitude: find("longitude"),
            event_id: find("event_id_cnty"),
            admin1: find("admin1"),
            source_scale: find("source_scale"),
            time_precision: find("time_precision"),
            year: find("year"),
        })
    }
}
