//! Shared test utilities for ced integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Corpora are static CSV text so every harness reads the
//! same bytes.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
