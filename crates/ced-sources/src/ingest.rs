//! Ingestion and merge.
//!
//! Each source is read in full, row by row. A row that fails coercion is
//! excluded and tallied under its [`RowError`]; the pass carries on. Sources
//! are merged in configured order and rows keep their file order, so the
//! same inputs always produce the same table.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use ced_core::config::SourceConfig;
use ced_core::normalizer::{clean_text, title_case};
use ced_core::{CorpusWindow, EventRecord, GeoPrecision, RecordContext, RowError};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;

use crate::error::SourceError;
use crate::schema::{standardize_header, ColumnMap};

/// Date layouts accepted in `event_date`, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d %B %Y", "%d-%b-%Y"];

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// What happened to one source's rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub rows_read: usize,
    pub retained: usize,
    pub excluded: BTreeMap<RowError, usize>,
    pub profile: SourceProfile,
}

/// Raw-extract facts gathered over every readable row, before any row is
/// excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceProfile {
    /// Standardized header names in file order.
    pub columns: Vec<String>,
    /// Earliest and latest parseable `event_date`, corpus window or not.
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Rows dated outside the window the extract was requested for.
    pub outside_expected_window: usize,
    /// Rows repeating an `event_id_cnty` seen earlier in the same extract.
    pub duplicate_event_ids: usize,
    /// Rows whose `year` column disagrees with the year of `event_date`.
    pub year_mismatches: usize,
    /// Empty cells per column; columns without gaps are left out.
    pub missing_values: BTreeMap<String, usize>,
}

impl SourceProfile {
    fn new(headers: &StringRecord) -> Self {
        Self {
            columns: headers.iter().map(standardize_header).collect(),
            ..Self::default()
        }
    }

    fn observe_cells(&mut self, row: &StringRecord) {
        for (i, column) in self.columns.iter().enumerate() {
            if row.get(i).and_then(clean_text).is_none() {
                *self.missing_values.entry(column.clone()).or_default() += 1;
            }
        }
    }

    fn observe_date(&mut self, date: NaiveDate, expected: bool, year: Option<i64>) {
        self.first_date = Some(self.first_date.map_or(date, |d| d.min(date)));
        self.last_date = Some(self.last_date.map_or(date, |d| d.max(date)));
        if !expected {
            self.outside_expected_window += 1;
        }
        if year.is_some_and(|y| y != i64::from(date.year())) {
            self.year_mismatches += 1;
        }
    }
}

impl SourceSummary {
    fn new(name: &str, profile: SourceProfile) -> Self {
        Self {
            name: name.to_string(),
            profile,
            ..Self::default()
        }
    }

    pub fn excluded_total(&self) -> usize {
        self.excluded.values().sum()
    }
}

/// The merged table plus per-source audit counts.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub records: Vec<EventRecord>,
    pub summaries: Vec<SourceSummary>,
}

impl Ingested {
    pub fn excluded_total(&self) -> usize {
        self.summaries.iter().map(SourceSummary::excluded_total).sum()
    }

    /// Exclusion counts summed across sources.
    pub fn excluded_by_reason(&self) -> BTreeMap<RowError, usize> {
        let mut out: BTreeMap<RowError, usize> = BTreeMap::new();
        for s in &self.summaries {
            for (reason, n) in &s.excluded {
                *out.entry(*reason).or_default() += n;
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Ingestor
// ---------------------------------------------------------------------------

/// Reads and coerces source extracts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ingestor {
    window: CorpusWindow,
}

impl Ingestor {
    pub fn new(window: CorpusWindow) -> Self {
        Self { window }
    }

    /// Read every source and concatenate the retained rows.
    pub fn merge(&self, sources: &[SourceConfig]) -> Result<Ingested, SourceError> {
        let mut merged = Ingested::default();
        for source in sources {
            let (records, summary) = self.read_path(source)?;
            merged.records.extend(records);
            merged.summaries.push(summary);
        }
        tracing::info!(
            sources = merged.summaries.len(),
            retained = merged.records.len(),
            excluded = merged.excluded_total(),
            "merged sources"
        );
        Ok(merged)
    }

    pub fn read_path(
        &self,
        source: &SourceConfig,
    ) -> Result<(Vec<EventRecord>, SourceSummary), SourceError> {
        let file = File::open(&source.path).map_err(|e| SourceError::Io {
            path: source.path.clone(),
            source: e,
        })?;
        self.read_extract(source, file)
    }

    /// Read one delimited extract from any reader, with no expected window.
    pub fn read_source<R: Read>(
        &self,
        name: &str,
        reader: R,
    ) -> Result<(Vec<EventRecord>, SourceSummary), SourceError> {
        let source = SourceConfig {
            name: name.to_string(),
            path: PathBuf::new(),
            expected_start: None,
            expected_end: None,
        };
        self.read_extract(&source, reader)
    }

    /// Read one delimited extract, profiling it against the source's
    /// expected window as rows go by.
    pub fn read_extract<R: Read>(
        &self,
        source: &SourceConfig,
        reader: R,
    ) -> Result<(Vec<EventRecord>, SourceSummary), SourceError> {
        let name = source.name.as_str();
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers().map_err(|e| SourceError::Csv {
            name: name.to_string(),
            source: e,
        })?;
        let map = ColumnMap::resolve(name, headers)?;

        let mut summary = SourceSummary::new(name, SourceProfile::new(headers));
        let mut seen_ids = HashSet::new();
        let mut records = Vec::new();

        for (i, row) in rdr.records().enumerate() {
            let row_number = i + 1;
            summary.rows_read += 1;
            let row = match row {
                Ok(row) => row,
                // I/O failures would repeat on every further read.
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(SourceError::Csv {
                        name: name.to_string(),
                        source: e,
                    })
                }
                Err(_) => {
                    tracing::debug!(source = name, row = row_number, "row excluded: unreadable");
                    *summary.excluded.entry(RowError::Unreadable).or_default() += 1;
                    continue;
                }
            };

            let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");
            summary.profile.observe_cells(&row);
            if let Some(id) = clean_text(field(map.event_id)) {
                if !seen_ids.insert(id) {
                    summary.profile.duplicate_event_ids += 1;
                }
            }

            let parsed = parse_date(field(Some(map.event_date))).and_then(|event_date| {
                let year = parse_integral(field(map.year).trim());
                summary
                    .profile
                    .observe_date(event_date, source.expects(event_date), year);
                self.parse_row(&map, &row, event_date, name, row_number)
            });
            match parsed {
                Ok(record) => records.push(record),
                Err(reason) => {
                    tracing::debug!(source = name, row = row_number, %reason, "row excluded");
                    *summary.excluded.entry(reason).or_default() += 1;
                }
            }
        }

        summary.retained = records.len();
        if summary.profile.outside_expected_window > 0 {
            tracing::warn!(
                source = name,
                rows = summary.profile.outside_expected_window,
                "rows dated outside the extract's expected window"
            );
        }
        tracing::info!(
            source = name,
            rows = summary.rows_read,
            retained = summary.retained,
            excluded = summary.excluded_total(),
            "loaded source"
        );
        Ok((records, summary))
    }

    fn parse_row(
        &self,
        map: &ColumnMap,
        row: &StringRecord,
        event_date: NaiveDate,
        source: &str,
        row_number: usize,
    ) -> Result<EventRecord, RowError> {
        let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");
        let text = |idx: Option<usize>| clean_text(field(idx));

        if !self.window.contains(event_date) {
            return Err(RowError::DateOutsideWindow);
        }
        let fatalities = parse_fatalities(field(Some(map.fatalities)))?;
        let geo_precision = parse_geo_precision(field(Some(map.geo_precision)))?;
        let latitude = parse_coordinate(field(map.latitude), 90.0)?;
        let longitude = parse_coordinate(field(map.longitude), 180.0)?;

        Ok(EventRecord {
            event_date,
            actor1: text(map.actor1),
            actor2: text(map.actor2),
            event_type: text(map.event_type).map(|t| title_case(&t)),
            sub_event_type: text(map.sub_event_type).map(|t| title_case(&t)),
            fatalities,
            latitude,
            longitude,
            geo_precision,
            context: RecordContext {
                source: source.to_string(),
                row: row_number,
                event_id: text(map.event_id),
                admin1: text(map.admin1),
                source_scale: text(map.source_scale),
                time_precision: parse_integral(field(map.time_precision).trim())
                    .and_then(|code| u8::try_from(code).ok()),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Parse `event_date`. Timestamps are accepted by their leading date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, RowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RowError::MissingEventDate);
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            raw.get(..10)
                .filter(|_| raw.len() > 10)
                .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        })
        .ok_or(RowError::MalformedEventDate)
}

/// Parse an integer column that spreadsheet round-trips may have written as
/// `3.0`.
fn parse_integral(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15)
        .map(|f| f as i64)
}

pub fn parse_fatalities(raw: &str) -> Result<u32, RowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RowError::MissingFatalities);
    }
    let n = parse_integral(raw).ok_or(RowError::MalformedFatalities)?;
    if n < 0 {
        return Err(RowError::NegativeFatalities);
    }
    u32::try_from(n).map_err(|_| RowError::MalformedFatalities)
}

pub fn parse_geo_precision(raw: &str) -> Result<GeoPrecision, RowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RowError::MissingGeoPrecision);
    }
    let code = parse_integral(raw).ok_or(RowError::MalformedGeoPrecision)?;
    GeoPrecision::from_code(code).ok_or(RowError::OutOfRangeGeoPrecision)
}

/// Empty coordinates are absent; anything else must be a finite number
/// within `±limit`.
pub fn parse_coordinate(raw: &str, limit: f64) -> Result<Option<f64>, RowError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(Some(v)),
        _ => Err(RowError::MalformedCoordinate),
    }
}
