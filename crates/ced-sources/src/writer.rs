//! Canonical and audit table writers.
//!
//! Values are formatted here rather than through serde so the byte output is
//! fixed: dates as `YYYY-MM-DD`, floats in shortest round-trip form, absent
//! values as empty fields.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use ced_core::types::CANONICAL_COLUMNS;
use ced_core::{AuditEntry, NormalizedEvent};
use csv::Writer;

use crate::error::SourceError;

const AUDIT_COLUMNS: [&str; 4] = ["actor", "bucket", "rule", "occurrences"];

fn opt_f64(v: Option<f64>) -> String {
    v.map(|f| f.to_string()).unwrap_or_default()
}

fn canonical_row(e: &NormalizedEvent) -> [String; 11] {
    let r = &e.event;
    [
        r.event_date.format("%Y-%m-%d").to_string(),
        r.actor1.clone().unwrap_or_default(),
        r.actor2.clone().unwrap_or_default(),
        r.event_type.clone().unwrap_or_default(),
        r.sub_event_type.clone().unwrap_or_default(),
        r.fatalities.to_string(),
        opt_f64(r.latitude),
        opt_f64(r.longitude),
        r.geo_precision.code().to_string(),
        e.period.label().to_string(),
        e.actor_bucket.label().to_string(),
    ]
}

/// Write the canonical cleaned table.
pub fn write_canonical<W: Write>(out: W, events: &[NormalizedEvent]) -> csv::Result<()> {
    let mut w = Writer::from_writer(out);
    w.write_record(CANONICAL_COLUMNS)?;
    for e in events {
        w.write_record(canonical_row(e))?;
    }
    w.flush()?;
    Ok(())
}

/// Write the taxonomy audit table.
pub fn write_audit<W: Write>(out: W, entries: &[AuditEntry]) -> csv::Result<()> {
    let mut w = Writer::from_writer(out);
    w.write_record(AUDIT_COLUMNS)?;
    for a in entries {
        w.write_record([
            a.actor.as_str(),
            a.bucket.label(),
            a.rule.as_deref().unwrap_or(""),
            a.occurrences.to_string().as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Create `path` (and its parent directories) for writing.
fn create(path: &Path) -> Result<File, SourceError> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    File::create(path).map_err(io_err)
}

pub fn write_canonical_path(path: &Path, events: &[NormalizedEvent]) -> Result<(), SourceError> {
    write_canonical(create(path)?, events).map_err(|source| SourceError::Csv {
        name: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = events.len(), "wrote canonical table");
    Ok(())
}

pub fn write_audit_path(path: &Path, entries: &[AuditEntry]) -> Result<(), SourceError> {
    write_audit(create(path)?, entries).map_err(|source| SourceError::Csv {
        name: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), actors = entries.len(), "wrote actor audit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ced_core::{ActorBucket, EventRecord, GeoPrecision, Period, RecordContext};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn event() -> NormalizedEvent {
        NormalizedEvent {
            event: EventRecord {
                event_date: NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
                actor1: Some("Rapid Support Forces".into()),
                actor2: Some("Civilians (Sudan)".into()),
                event_type: Some("Battles".into()),
                sub_event_type: Some("Armed Clash".into()),
                fatalities: 12,
                latitude: Some(15.6),
                longitude: Some(32.0),
                geo_precision: GeoPrecision::Near,
                context: RecordContext::default(),
            },
            period: Period::War,
            actor_bucket: ActorBucket::Rsf,
            counterpart_bucket: Some(ActorBucket::OtherArmedGroups),
        }
    }

    #[test]
    fn canonical_layout() {
        let mut buf = Vec::new();
        write_canonical(&mut buf, &[event()]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "event_date,actor1,actor2,event_type,sub_event_type,fatalities,latitude,longitude,geo_precision,period,actor_bucket\n\
             2023-04-15,Rapid Support Forces,Civilians (Sudan),Battles,Armed Clash,12,15.6,32,2,war,RSF\n"
        );
    }

    #[test]
    fn audit_layout() {
        let mut buf = Vec::new();
        let entries = vec![AuditEntry {
            actor: "Militia, Local".into(),
            bucket: ActorBucket::OtherArmedGroups,
            rule: None,
            occurrences: 3,
        }];
        write_audit(&mut buf, &entries).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "actor,bucket,rule,occurrences\n\"Militia, Local\",Other Armed Groups,,3\n"
        );
    }

    #[test]
    fn path_writer_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        write_canonical_path(&path, &[event()]).unwrap();
        assert!(path.exists());
    }
}
