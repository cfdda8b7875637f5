//! Test builders: ergonomic constructors for `EventRecord`, normalized
//! tables and configs rooted in a temporary directory.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::path::Path;

use ced_core::config::{Config, SourceConfig};
use ced_core::{
    ActorNormalizer, EventRecord, GeoPrecision, NormalizedEvent, RecordContext, Taxonomy,
};
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` literal.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date literal")
}

// ---------------------------------------------------------------------------
// EventRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`EventRecord`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = EventRecordBuilder::new("2023-04-15")
///     .actor1("Rapid Support Forces")
///     .event_type("Battles")
///     .fatalities(12)
///     .at(15.6, 32.5)
///     .build();
/// ```
pub struct EventRecordBuilder {
    record: EventRecord,
}

impl EventRecordBuilder {
    pub fn new(event_date: &str) -> Self {
        Self {
            record: EventRecord {
                event_date: date(event_date),
                actor1: None,
                actor2: None,
                event_type: None,
                sub_event_type: None,
                fatalities: 0,
                latitude: None,
                longitude: None,
                geo_precision: GeoPrecision::Exact,
                context: RecordContext {
                    source: "test".to_string(),
                    row: 1,
                    ..RecordContext::default()
                },
            },
        }
    }

    pub fn actor1(mut self, name: impl Into<String>) -> Self {
        self.record.actor1 = Some(name.into());
        self
    }

    pub fn actor2(mut self, name: impl Into<String>) -> Self {
        self.record.actor2 = Some(name.into());
        self
    }

    pub fn event_type(mut self, value: impl Into<String>) -> Self {
        self.record.event_type = Some(value.into());
        self
    }

    pub fn sub_event_type(mut self, value: impl Into<String>) -> Self {
        self.record.sub_event_type = Some(value.into());
        self
    }

    pub fn fatalities(mut self, n: u32) -> Self {
        self.record.fatalities = n;
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.record.latitude = Some(latitude);
        self.record.longitude = Some(longitude);
        self
    }

    pub fn precision(mut self, p: GeoPrecision) -> Self {
        self.record.geo_precision = p;
        self
    }

    pub fn source(mut self, name: impl Into<String>) -> Self {
        self.record.context.source = name.into();
        self
    }

    pub fn event_id(mut self, id: impl Into<String>) -> Self {
        self.record.context.event_id = Some(id.into());
        self
    }

    pub fn admin1(mut self, name: impl Into<String>) -> Self {
        self.record.context.admin1 = Some(name.into());
        self
    }

    pub fn source_scale(mut self, scale: impl Into<String>) -> Self {
        self.record.context.source_scale = Some(scale.into());
        self
    }

    pub fn build(self) -> EventRecord {
        self.record
    }
}

/// Normalize `records` with the built-in taxonomy.
pub fn normalized(records: Vec<EventRecord>) -> Vec<NormalizedEvent> {
    let taxonomy = Taxonomy::builtin();
    ActorNormalizer::new(&taxonomy).normalize_all(records)
}

// ---------------------------------------------------------------------------
// Workspace configs
// ---------------------------------------------------------------------------

/// Write each `(name, csv)` pair under `root/raw/` and return a default
/// config that reads them in order and writes every output under
/// `root/out/`.
pub fn config_in(root: &Path, sources: &[(&str, &str)]) -> Config {
    let raw = root.join("raw");
    std::fs::create_dir_all(&raw).expect("create raw dir");

    let mut config = Config::defaults();
    config.sources = sources
        .iter()
        .map(|(name, body)| {
            let path = raw.join(format!("{name}.csv"));
            std::fs::write(&path, body).expect("write source fixture");
            SourceConfig {
                name: name.to_string(),
                path,
                expected_start: None,
                expected_end: None,
            }
        })
        .collect();

    let out = root.join("out");
    config.output.cleaned = out.join("cleaned_events.csv");
    config.output.audit = out.join("actor_audit.csv");
    config.output.report_dir = out.join("report");
    config
}
