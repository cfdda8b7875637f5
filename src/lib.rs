//! ced: Conflict Event Digest
//!
//! Batch pipeline that turns raw conflict-event extracts into one analysis
//! ready table, an actor audit table and figure-ready report datasets. This
//! crate wires the workspace libraries together so that the CLI and the
//! integration harnesses drive exactly the same pass.
//!
//! # Architecture
//!
//! ```text
//! ced-sources ──► ced-core ──► ced-sources (writer)
//!   ingest        normalize      canonical + audit
//!                     │
//!                     └──► ced-report
//! ```

pub mod pipeline;

pub use pipeline::{Pipeline, RunSummary};
