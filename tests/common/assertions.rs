//! Domain-specific assertion macros for ced harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* row or record broke the expectation.

// ---------------------------------------------------------------------------
// Classification assertions
// ---------------------------------------------------------------------------

/// Assert that an actor name classifies into a specific bucket.
///
/// ```rust
/// assert_bucket!(taxonomy, "Rapid Support Forces", ActorBucket::Rsf);
/// ```
#[macro_export]
macro_rules! assert_bucket {
    ($taxonomy:expr, $name:expr, $bucket:expr) => {{
        let taxonomy: &ced_core::Taxonomy = &$taxonomy;
        let name: &str = $name;
        let expected: ced_core::ActorBucket = $bucket;
        let got = taxonomy.classify(name);
        if got.bucket != expected {
            panic!(
                "assert_bucket! failed for {:?}\n  expected: {}\n  actual:   {} (rule {:?})",
                name,
                expected,
                got.bucket,
                got.rule.map(|i| taxonomy.rules()[i].describe())
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Table assertions
// ---------------------------------------------------------------------------

/// Assert that every record in a normalized table satisfies a predicate.
///
/// ```rust
/// assert_all_events!(events, |e| e.event.fatalities < 1000);
/// ```
#[macro_export]
macro_rules! assert_all_events {
    ($events:expr, $pred:expr) => {{
        let events: &[ced_core::NormalizedEvent] = &$events;
        for (i, e) in events.iter().enumerate() {
            if !($pred)(e) {
                panic!(
                    "assert_all_events! failed at index {} ({} row {}):\n  {:#?}",
                    i, e.event.context.source, e.event.context.row, e
                );
            }
        }
    }};
}

/// Assert the exclusion tally for one reason.
///
/// ```rust
/// assert_excluded!(summary, RowError::NegativeFatalities, 1);
/// ```
#[macro_export]
macro_rules! assert_excluded {
    ($summary:expr, $reason:expr, $n:expr) => {{
        let reason: ced_core::RowError = $reason;
        let got = $summary.excluded.get(&reason).copied().unwrap_or(0);
        pretty_assertions::assert_eq!(
            got,
            $n,
            "exclusion count for {:?}; full tally: {:?}",
            reason,
            $summary.excluded
        );
    }};
}
