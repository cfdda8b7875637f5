//! One-pass orchestration: ingest, normalize, write.
//!
//! The pipeline owns the loaded [`Config`] and the [`Taxonomy`] it selects.
//! Every stage is a plain synchronous call; the only state carried between
//! them is the table itself.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use ced_core::{
    ActorBucket, ActorNormalizer, AuditEntry, Config, EventRecord, NormalizedEvent, Period,
    RowError, Taxonomy,
};
use ced_report::validation::{self, SourceValidation};
use ced_report::Report;
use ced_sources::{Ingested, Ingestor, SourceSummary};

/// What a full run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub taxonomy_version: String,
    pub sources: Vec<SourceSummary>,
    pub retained: usize,
    pub excluded: BTreeMap<RowError, usize>,
    pub by_bucket: BTreeMap<ActorBucket, usize>,
    pub by_period: BTreeMap<Period, usize>,
    pub cleaned: PathBuf,
    pub audit: PathBuf,
    pub report_files: Vec<PathBuf>,
}

pub struct Pipeline {
    config: Config,
    taxonomy: Taxonomy,
}

impl Pipeline {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let taxonomy = config.taxonomy().context("loading actor taxonomy")?;
        tracing::info!(
            version = taxonomy.version(),
            rules = taxonomy.rules().len(),
            "taxonomy loaded"
        );
        Ok(Self { config, taxonomy })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn normalizer(&self) -> ActorNormalizer<'_> {
        ActorNormalizer::new(&self.taxonomy)
    }

    /// Read and merge every configured source.
    pub fn ingest(&self) -> anyhow::Result<Ingested> {
        Ingestor::new(self.config.corpus)
            .merge(&self.config.sources)
            .context("ingesting sources")
    }

    pub fn normalize(&self, records: Vec<EventRecord>) -> Vec<NormalizedEvent> {
        self.normalizer().normalize_all(records)
    }

    /// Full pass: canonical table, audit table, report datasets and the
    /// validation report.
    pub fn run(&self) -> anyhow::Result<RunSummary> {
        let ingested = self.ingest()?;
        let excluded = ingested.excluded_by_reason();
        let checks = validation::validate(&ingested);
        let audit = self.normalizer().audit(&ingested.records);
        let events = self.normalize(ingested.records);

        let out = &self.config.output;
        ced_sources::write_canonical_path(&out.cleaned, &events)
            .context("writing canonical table")?;
        ced_sources::write_audit_path(&out.audit, &audit).context("writing audit table")?;

        let report = Report::build(&events, &self.config.report, &self.config.geo);
        let mut report_files = report
            .write_to(&out.report_dir)
            .context("writing report datasets")?;
        report_files.push(
            ced_report::write_json(&out.report_dir, "validation.json", &checks)
                .context("writing validation report")?,
        );

        let mut by_bucket = BTreeMap::new();
        let mut by_period = BTreeMap::new();
        for e in &events {
            *by_bucket.entry(e.actor_bucket).or_insert(0usize) += 1;
            *by_period.entry(e.period).or_insert(0usize) += 1;
        }

        Ok(RunSummary {
            taxonomy_version: self.taxonomy.version().to_string(),
            sources: ingested.summaries,
            retained: events.len(),
            excluded,
            by_bucket,
            by_period,
            cleaned: out.cleaned.clone(),
            audit: out.audit.clone(),
            report_files,
        })
    }

    /// Ingest and write only `validation.json`.
    pub fn validate(&self) -> anyhow::Result<(Vec<SourceValidation>, PathBuf)> {
        let ingested = self.ingest()?;
        let checks = validation::validate(&ingested);
        let path = ced_report::write_json(&self.config.output.report_dir, "validation.json", &checks)
            .context("writing validation report")?;
        Ok((checks, path))
    }

    /// Ingest and write only the audit table.
    pub fn audit(&self) -> anyhow::Result<Vec<AuditEntry>> {
        let ingested = self.ingest()?;
        let audit = self.normalizer().audit(&ingested.records);
        ced_sources::write_audit_path(&self.config.output.audit, &audit)
            .context("writing audit table")?;
        Ok(audit)
    }
}
