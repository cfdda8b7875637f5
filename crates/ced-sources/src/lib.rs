//! ced-sources: delimited source adapters for ced.
//!
//! Reads raw provider extracts, standardizes their headers, coerces each row
//! into an [`ced_core::EventRecord`] and merges the extracts into one table.
//! Rows that cannot be coerced are excluded and tallied; a missing required
//! column aborts. The same crate writes the canonical cleaned table and the
//! taxonomy audit table.

pub mod error;
pub mod ingest;
pub mod schema;
pub mod writer;

pub use error::SourceError;
pub use ingest::{Ingested, Ingestor, SourceProfile, SourceSummary};
pub use writer::{write_audit, write_audit_path, write_canonical, write_canonical_path};
