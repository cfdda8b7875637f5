//! ced-core: Conflict Event Digest core library.
//!
//! This crate holds the record types shared by every stage, plus the three
//! pieces of real decision logic in the pipeline: actor normalization,
//! structural-break tagging and the geo-precision placement policy.
//!
//! # Architecture
//!
//! ```text
//! Sources ──► Ingest/Merge ──► Normalize ──► Canonical table
//!                                  │
//!                                  └──► Audit / Report
//! ```
//!
//! Every stage is a synchronous pass that consumes the previous table and
//! returns a new one. Nothing here holds state between calls.

pub mod config;
pub mod error;
pub mod geo;
pub mod normalizer;
pub mod period;
pub mod taxonomy;
pub mod types;

pub use config::{Config, SourceConfig};
pub use error::{RowError, SchemaError, TaxonomyError};
pub use geo::{GeoPolicy, MapScale, Placement};
pub use normalizer::{ActorNormalizer, AuditEntry};
pub use period::{CorpusWindow, Period};
pub use taxonomy::{Classification, Taxonomy};
pub use types::{ActorBucket, EventRecord, GeoPrecision, NormalizedEvent, RecordContext};
