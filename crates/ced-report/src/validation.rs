//! Data readiness checks run before the merged table is trusted for
//! aggregation.
//!
//! Raw-extract facts (row counts, exclusions, date coverage, duplicate event
//! ids, empty cells, header drift) come from the ingestion profile, so rows
//! that never made it into the table still show up here. Precision mixes and
//! the fatality baseline are taken over the retained rows.

use std::collections::{BTreeMap, BTreeSet};

use ced_core::geo::{is_high_geo, is_low_geo};
use ced_core::{EventRecord, GeoPrecision, RowError};
use ced_sources::{Ingested, SourceSummary};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PrecisionShare {
    pub events: usize,
    pub share_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoDistribution {
    pub exact: PrecisionShare,
    pub near: PrecisionShare,
    pub region: PrecisionShare,
    /// Share located to the exact place.
    pub high_geo_pct: f64,
    pub low_geo_pct: f64,
}

/// Distribution of the provider's date-precision code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeDistribution {
    /// Events per code; events without a code are not listed.
    pub codes: BTreeMap<u8, usize>,
    pub exact_time_pct: f64,
    pub estimated_time_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FatalityBaseline {
    pub total: u64,
    pub median: f64,
    /// Events reporting zero fatalities, in percent.
    pub zero_share_pct: f64,
}

/// Header layout compared against the first configured source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaCheck {
    /// Same columns in the same order as the reference source.
    pub consistent: bool,
    pub missing_columns: Vec<String>,
    pub extra_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceValidation {
    pub name: String,
    pub rows_read: usize,
    pub retained: usize,
    pub excluded: BTreeMap<RowError, usize>,
    pub columns: usize,
    pub schema: SchemaCheck,
    pub missing_values: BTreeMap<String, usize>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub duplicate_event_ids: usize,
    /// Rows dated outside the window the extract was requested for.
    pub outside_expected_window: usize,
    pub year_mismatches: usize,
    pub time_precision: TimeDistribution,
    pub geo_precision: GeoDistribution,
    pub fatalities: FatalityBaseline,
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn median(values: &mut [u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (f64::from(values[mid - 1]) + f64::from(values[mid])) / 2.0
    } else {
        f64::from(values[mid])
    }
}

fn schema_check(columns: &[String], reference: &[String]) -> SchemaCheck {
    let have: BTreeSet<&String> = columns.iter().collect();
    let want: BTreeSet<&String> = reference.iter().collect();
    SchemaCheck {
        consistent: columns == reference,
        missing_columns: want.difference(&have).map(|c| c.to_string()).collect(),
        extra_columns: have.difference(&want).map(|c| c.to_string()).collect(),
    }
}

fn geo_distribution(rows: &[&EventRecord]) -> GeoDistribution {
    let share = |p: GeoPrecision| {
        let events = rows.iter().filter(|r| r.geo_precision == p).count();
        PrecisionShare {
            events,
            share_pct: pct(events, rows.len()),
        }
    };
    let high = rows.iter().filter(|r| is_high_geo(r.geo_precision)).count();
    let low = rows.iter().filter(|r| is_low_geo(r.geo_precision)).count();
    GeoDistribution {
        exact: share(GeoPrecision::Exact),
        near: share(GeoPrecision::Near),
        region: share(GeoPrecision::Region),
        high_geo_pct: pct(high, rows.len()),
        low_geo_pct: pct(low, rows.len()),
    }
}

fn time_distribution(rows: &[&EventRecord]) -> TimeDistribution {
    let mut codes: BTreeMap<u8, usize> = BTreeMap::new();
    for code in rows.iter().filter_map(|r| r.context.time_precision) {
        *codes.entry(code).or_default() += 1;
    }
    let exact = rows.iter().filter(|r| r.context.is_exact_time()).count();
    let estimated = rows.iter().filter(|r| r.context.is_estimated_time()).count();
    TimeDistribution {
        codes,
        exact_time_pct: pct(exact, rows.len()),
        estimated_time_pct: pct(estimated, rows.len()),
    }
}

fn validate_one(
    summary: &SourceSummary,
    reference: &[String],
    rows: &[&EventRecord],
) -> SourceValidation {
    let profile = &summary.profile;
    let schema = schema_check(&profile.columns, reference);
    if !schema.consistent {
        tracing::warn!(
            source = %summary.name,
            missing = ?schema.missing_columns,
            extra = ?schema.extra_columns,
            "header differs from the first source"
        );
    }
    if profile.year_mismatches > 0 {
        tracing::warn!(
            source = %summary.name,
            rows = profile.year_mismatches,
            "year column disagrees with event_date"
        );
    }

    let mut fatalities: Vec<u32> = rows.iter().map(|r| r.fatalities).collect();
    let zero = fatalities.iter().filter(|f| **f == 0).count();

    SourceValidation {
        name: summary.name.clone(),
        rows_read: summary.rows_read,
        retained: summary.retained,
        excluded: summary.excluded.clone(),
        columns: profile.columns.len(),
        schema,
        missing_values: profile.missing_values.clone(),
        first_date: profile.first_date,
        last_date: profile.last_date,
        duplicate_event_ids: profile.duplicate_event_ids,
        outside_expected_window: profile.outside_expected_window,
        year_mismatches: profile.year_mismatches,
        time_precision: time_distribution(rows),
        geo_precision: geo_distribution(rows),
        fatalities: FatalityBaseline {
            total: fatalities.iter().map(|f| u64::from(*f)).sum(),
            median: median(&mut fatalities),
            zero_share_pct: pct(zero, rows.len()),
        },
    }
}

/// Validate every ingested source, in merge order. Headers are checked
/// against the first source.
pub fn validate(ingested: &Ingested) -> Vec<SourceValidation> {
    let mut by_source: BTreeMap<&str, Vec<&EventRecord>> = BTreeMap::new();
    for r in &ingested.records {
        by_source.entry(r.context.source.as_str()).or_default().push(r);
    }
    let reference = ingested
        .summaries
        .first()
        .map(|s| s.profile.columns.as_slice())
        .unwrap_or(&[]);
    ingested
        .summaries
        .iter()
        .map(|s| {
            let rows = by_source.get(s.name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            validate_one(s, reference, rows)
        })
        .collect()
}
